//! Core library for the k7 project scaffolder.
//!
//! k7 builds a new Go backend by composing independently versioned template
//! collections, one per architectural concern (storage, server, service,
//! entities), and writing the result to disk:
//!
//! 1. [`variant`]: the caller picks one variant per concern
//! 2. [`generator`]: each [`assets::AssetCollection`] yields the files for that variant
//! 3. [`composer`]: generators run in a fixed order into one [`composer::Manifest`]
//! 4. [`injector`]: every entry is rendered against the [`context::ProjectContext`]
//!    and written under the project root
//!
//! [`project::scaffold`] runs steps 2–4; [`toolchain`] drives `go` and `git`
//! around it.

pub mod assets;
pub mod composer;
pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod injector;
pub mod project;
pub mod templates;
pub mod toolchain;
pub mod variant;

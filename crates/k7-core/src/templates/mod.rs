//! Template system for k7 project scaffolding.
//!
//! Templates are embedded into the binary at compile-time via [`include_str!`]
//! in the [`embedded`] module, grouped into one asset collection per concern,
//! then rendered at runtime with [Handlebars](https://handlebarsjs.com/) via the
//! [`renderer::TemplateRenderer`].
//!
//! ## Template variables
//!
//! Templates use Handlebars syntax and see the keys of
//! [`crate::context::ProjectContext`]:
//! - `{{project_name}}`: project directory name
//! - `{{module_path}}`: Go module path used in import statements
//! - `{{storage_dir}}`, `{{server_dir}}`, `{{service_dir}}`, `{{entities_dir}}`:
//!   layout base paths, for imports between layers
//! - `{{storage}}`, `{{server}}`: selected variant tags
//! - `{{unix_based}}`: host OS family, for Makefile commands
//!
//! **Warning**: Template files in `templates/` and the tables in [`embedded`]
//! must stay in sync. The `include_str!` paths are checked at compile-time.

pub mod embedded;
pub mod renderer;

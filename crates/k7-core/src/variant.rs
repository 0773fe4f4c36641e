//! Variant identifiers: the closed set of implementation options per concern.
//!
//! Each concern that offers a choice (storage, server) has its own enum. A tag
//! outside the enum is rejected with [`K7Error::UnknownVariant`] at parse time,
//! which happens before any template is read or any file is written.
//!
//! Every variant maps to a fixed bundle: the asset subtree named by its tag and
//! the Go modules the generated code imports. Adding a variant means adding an
//! enum arm here and a subtree under `templates/files/<collection>/<tag>/`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{K7Error, Result};

/// An architectural concern of the generated project.
///
/// Each concern owns one or more template collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Concern {
    Storage,
    Server,
    Service,
    Entities,
    /// Files at the project root (README, Makefile, env).
    Project,
}

impl Concern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Server => "server",
            Self::Service => "service",
            Self::Entities => "entities",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database management system backing the storage layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageVariant {
    #[default]
    Postgres,
}

impl StorageVariant {
    pub const ALL: &'static [Self] = &[Self::Postgres];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Postgres => "Postgres",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Postgres => {
                "PostgreSQL, a powerful open source object-relational database (pgx + Uptrace Bun)"
            }
        }
    }

    /// Go modules the generated storage layer imports.
    pub fn go_packages(&self) -> &'static [&'static str] {
        match self {
            Self::Postgres => &[
                "github.com/jackc/pgx/v5",
                "github.com/uptrace/bun",
                "github.com/alexlast/bunzap",
                "github.com/uptrace/bun/dialect/pgdialect",
            ],
        }
    }
}

impl FromStr for StorageVariant {
    type Err = K7Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.tag() == s)
            .ok_or_else(|| unknown_variant(Concern::Storage, s, Self::ALL.iter().map(Self::tag)))
    }
}

impl fmt::Display for StorageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// HTTP framework used by the generated server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerVariant {
    #[default]
    Huma,
}

impl ServerVariant {
    pub const ALL: &'static [Self] = &[Self::Huma];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Huma => "huma",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Huma => "Huma",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Huma => {
                "Huma, a micro framework for HTTP REST/RPC APIs backed by OpenAPI 3 and JSON Schema"
            }
        }
    }

    /// Go modules the generated server imports.
    pub fn go_packages(&self) -> &'static [&'static str] {
        match self {
            Self::Huma => &["github.com/danielgtaylor/huma/v2", "github.com/go-chi/chi/v5"],
        }
    }
}

impl FromStr for ServerVariant {
    type Err = K7Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.tag() == s)
            .ok_or_else(|| unknown_variant(Concern::Server, s, Self::ALL.iter().map(Self::tag)))
    }
}

impl fmt::Display for ServerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One variant per concern that offers a choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selections {
    pub storage: StorageVariant,
    pub server: ServerVariant,
}

impl Selections {
    pub fn new(storage: StorageVariant, server: ServerVariant) -> Self {
        Self { storage, server }
    }

    /// Parse raw tags from user input. Fails on the first unknown tag.
    pub fn parse(storage: &str, server: &str) -> Result<Self> {
        Ok(Self {
            storage: storage.parse()?,
            server: server.parse()?,
        })
    }

    /// The tag selected for `concern`, if that concern offers a choice.
    pub fn tag_for(&self, concern: Concern) -> Option<&'static str> {
        match concern {
            Concern::Storage => Some(self.storage.tag()),
            Concern::Server => Some(self.server.tag()),
            Concern::Service | Concern::Entities | Concern::Project => None,
        }
    }

    /// All Go modules the selected variants need, base packages first.
    pub fn go_packages(&self) -> Vec<&'static str> {
        let mut packages = vec!["go.uber.org/zap", "github.com/joho/godotenv"];
        packages.extend_from_slice(self.storage.go_packages());
        packages.extend_from_slice(self.server.go_packages());
        packages
    }
}

pub(crate) fn unknown_variant<'a>(
    concern: Concern,
    tag: &str,
    allowed: impl IntoIterator<Item = &'a str>,
) -> K7Error {
    K7Error::UnknownVariant {
        concern: concern.to_string(),
        tag: tag.to_string(),
        allowed: allowed.into_iter().map(str::to_string).collect(),
    }
}

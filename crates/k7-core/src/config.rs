//! Output layout configuration.
//!
//! A [`LayoutConfig`] fixes the base path each concern's files are generated
//! under. The defaults follow the usual Go `internal/` layout; a JSON file can
//! override any subset of them:
//!
//! ```json
//! { "storage": "internal/db", "server": "internal/http" }
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{K7Error, Result};
use crate::variant::Concern;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub storage: String,
    pub server: String,
    pub service: String,
    pub entities: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            storage: "internal/storage".into(),
            server: "internal/server".into(),
            service: "internal/service".into(),
            entities: "internal/entities".into(),
        }
    }
}

impl LayoutConfig {
    /// Load overrides from a JSON file. Keys left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| K7Error::ConfigNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| K7Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Base path for `concern`, relative to the project root.
    pub fn base_for(&self, concern: Concern) -> &str {
        match concern {
            Concern::Storage => &self.storage,
            Concern::Server => &self.server,
            Concern::Service => &self.service,
            Concern::Entities => &self.entities,
            Concern::Project => "",
        }
    }

    /// Every base path must be a non-empty relative path that stays inside the project.
    pub fn validate(&self) -> Result<()> {
        for concern in [
            Concern::Storage,
            Concern::Server,
            Concern::Service,
            Concern::Entities,
        ] {
            let base = self.base_for(concern);
            let valid = !base.trim_matches('/').is_empty()
                && !base.starts_with('/')
                && Path::new(base)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !valid {
                return Err(K7Error::InvalidLayout {
                    concern: concern.to_string(),
                    path: base.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let layout = LayoutConfig::default();
        layout.validate().unwrap();
        assert_eq!(layout.base_for(Concern::Storage), "internal/storage");
        assert_eq!(layout.base_for(Concern::Project), "");
    }

    #[test]
    fn test_load_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{ "server": "internal/http" }"#).unwrap();
        let layout = LayoutConfig::load(&path).unwrap();
        assert_eq!(layout.server, "internal/http");
        assert_eq!(layout.storage, "internal/storage");
    }

    #[test]
    fn test_load_missing_file() {
        let err = LayoutConfig::load(Path::new("/tmp/nonexistent_k7_layout.json")).unwrap_err();
        assert!(matches!(err, K7Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = LayoutConfig::load(&path).unwrap_err();
        assert!(matches!(err, K7Error::ConfigParse { .. }));
    }

    #[test]
    fn test_rejects_escaping_paths() {
        for bad in ["", "/abs/storage", "../storage", "internal/../../x", "./"] {
            let layout = LayoutConfig {
                storage: bad.into(),
                ..LayoutConfig::default()
            };
            assert!(layout.validate().is_err(), "accepted {bad:?}");
        }
    }
}

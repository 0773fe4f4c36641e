//! Parameter context shared by every template render.
//!
//! A [`ProjectContext`] is built once per invocation, before composition, and
//! frozen into a JSON value that the injector hands to each template. Templates
//! see these keys:
//!
//! | Key | Example |
//! |---|---|
//! | `project_name` | `demo` |
//! | `module_path` | `github.com/acme/demo` |
//! | `absolute_path` | `/home/me/code/demo` |
//! | `storage` | `postgres` |
//! | `server` | `huma` |
//! | `storage_dir` | `internal/storage` |
//! | `server_dir` | `internal/server` |
//! | `service_dir` | `internal/service` |
//! | `entities_dir` | `internal/entities` |
//! | `unix_based` | `true` |
//! | `git` | `commit` |

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::LayoutConfig;
use crate::toolchain::GitPolicy;
use crate::variant::{Selections, ServerVariant, StorageVariant};

/// Project-level facts injected into templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    project_name: String,
    module_path: String,
    absolute_path: PathBuf,
    storage: StorageVariant,
    server: ServerVariant,
    unix_based: bool,
    git: GitPolicy,
    layout: LayoutConfig,
}

impl ProjectContext {
    /// Context for `name` rooted at `absolute_path`.
    ///
    /// The Go module path defaults to the project name, the OS family is
    /// detected from the build target, and git is skipped.
    pub fn new(name: &str, absolute_path: &Path, selections: &Selections) -> Self {
        Self {
            project_name: name.to_string(),
            module_path: name.to_string(),
            absolute_path: absolute_path.to_path_buf(),
            storage: selections.storage,
            server: selections.server,
            unix_based: is_unix_based(),
            git: GitPolicy::Skip,
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_module_path(mut self, module_path: &str) -> Self {
        self.module_path = module_path.to_string();
        self
    }

    pub fn with_git(mut self, git: GitPolicy) -> Self {
        self.git = git;
        self
    }

    pub fn with_unix_based(mut self, unix_based: bool) -> Self {
        self.unix_based = unix_based;
        self
    }

    pub fn with_layout(mut self, layout: &LayoutConfig) -> Self {
        self.layout = layout.clone();
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    pub fn git(&self) -> GitPolicy {
        self.git
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn selections(&self) -> Selections {
        Selections::new(self.storage, self.server)
    }

    /// The data handed to the template engine.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "project_name": self.project_name,
            "module_path": self.module_path,
            "absolute_path": self.absolute_path.display().to_string(),
            "storage": self.storage.tag(),
            "server": self.server.tag(),
            "unix_based": self.unix_based,
            "git": self.git.as_str(),
            "storage_dir": self.layout.storage.trim_matches('/'),
            "server_dir": self.layout.server.trim_matches('/'),
            "service_dir": self.layout.service.trim_matches('/'),
            "entities_dir": self.layout.entities.trim_matches('/'),
        })
    }
}

/// Whether the host OS is Unix-like (affects Makefile and build commands).
pub fn is_unix_based() -> bool {
    !cfg!(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = ProjectContext::new("demo", Path::new("/tmp/demo"), &Selections::default());
        assert_eq!(ctx.project_name(), "demo");
        assert_eq!(ctx.module_path(), "demo");
        assert_eq!(ctx.git(), GitPolicy::Skip);
        assert_eq!(ctx.selections(), Selections::default());
    }

    #[test]
    fn test_builder_overrides() {
        let ctx = ProjectContext::new("demo", Path::new("/tmp/demo"), &Selections::default())
            .with_module_path("github.com/acme/demo")
            .with_git(GitPolicy::Commit)
            .with_unix_based(false);
        let value = ctx.to_value();
        assert_eq!(value["module_path"], "github.com/acme/demo");
        assert_eq!(value["git"], "commit");
        assert_eq!(value["unix_based"], false);
    }

    #[test]
    fn test_value_carries_variant_tags() {
        let ctx = ProjectContext::new("demo", Path::new("/tmp/demo"), &Selections::default());
        let value = ctx.to_value();
        assert_eq!(value["project_name"], "demo");
        assert_eq!(value["storage"], "postgres");
        assert_eq!(value["server"], "huma");
        assert_eq!(value["absolute_path"], "/tmp/demo");
    }

    #[test]
    fn test_value_carries_layout() {
        let layout = LayoutConfig {
            server: "internal/http/".into(),
            ..LayoutConfig::default()
        };
        let ctx = ProjectContext::new("demo", Path::new("/tmp/demo"), &Selections::default())
            .with_layout(&layout);
        let value = ctx.to_value();
        assert_eq!(value["server_dir"], "internal/http");
        assert_eq!(value["storage_dir"], "internal/storage");
    }
}

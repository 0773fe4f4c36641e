//! Unified error types for the k7 toolkit.

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur while composing or materializing a project.
#[derive(Error, Debug)]
pub enum K7Error {
    // --- Selection ---

    /// A variant tag that is not in the concern's allowed set.
    #[error("unknown {concern} variant: '{tag}' (supported: {})", allowed.join(", "))]
    UnknownVariant {
        concern: String,
        tag: String,
        allowed: Vec<String>,
    },

    /// The git policy is not one of `commit`, `stage`, `skip`.
    #[error("unknown git policy: {0} (supported: commit, stage, skip)")]
    UnknownGitPolicy(String),

    // --- Composition ---

    /// An embedded asset does not follow the `<root>/[<variant>/]<path>.tmpl` form.
    ///
    /// Assets are compiled into the binary, so this is a build defect.
    #[error("cannot read embedded asset {path}: {reason}")]
    AssetRead { path: String, reason: String },

    /// Two generators produced the same output path.
    #[error("manifest collision: {path} is produced by more than one template collection")]
    ManifestCollision { path: String },

    // --- Materialization ---

    /// Parent directories of an output file could not be created.
    #[error("error creating directory {path}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be created or written.
    #[error("error creating file {path}")]
    FileCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A built-in template is not valid Handlebars.
    #[error("failed to parse template for {path}: {message}")]
    TemplateParse { path: String, message: String },

    /// A template referenced a field the parameter context does not carry.
    #[error("error executing template for {path}: {message}")]
    TemplateExec { path: String, message: String },

    // --- Configuration ---

    /// The layout file passed with `--layout` was not found.
    #[error("config file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The layout file exists but contains invalid JSON.
    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A layout base path is absolute or escapes the project directory.
    #[error("invalid layout path for {concern}: {path}")]
    InvalidLayout { concern: String, path: String },

    // --- Project ---

    /// The project name is unusable as a directory and module name.
    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// Attempted to create a project in a directory that already has content.
    #[error("directory '{}' already exists and is not empty", .0.display())]
    ProjectExists(PathBuf),

    // --- Toolchain ---

    /// A required external tool (e.g. `go`, `git`) is not installed.
    #[error("required tool '{name}' not found, install: {install}")]
    MissingTool { name: String, install: String },

    /// An external tool exited unsuccessfully.
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// `user.name` or `user.email` is unset in git config, so commits cannot be created.
    #[error("{key} is not set in git config; run `git config --global {key} <value>` first")]
    GitIdentityMissing { key: String },

    // --- General ---

    /// A filesystem I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, K7Error>`.
pub type Result<T> = std::result::Result<T, K7Error>;

//! Project directory preparation and the compose-then-materialize pipeline.
//!
//! Provides helpers for the `init` command to validate the project name, make
//! sure the destination is usable, and write the generated tree.
//!
//! ## Directory layout
//!
//! With the default [`LayoutConfig`](crate::config::LayoutConfig) a generated project looks like:
//! ```text
//! <project>/
//! ├── main.go                     # framework entrypoint
//! ├── Makefile, README.md, .env, .gitignore, .air.toml
//! └── internal/
//!     ├── storage/                # repository interfaces
//!     │   └── <dbms>/             # implementation + migrations
//!     ├── server/                 # router, handlers, middleware
//!     ├── service/                # domain services
//!     └── entities/               # shared entity types
//! ```

use std::path::Path;

use crate::composer::{Composer, Manifest};
use crate::context::ProjectContext;
use crate::error::{K7Error, Result};
use crate::injector::{Filesystem, Injector, MaterializeReport};

/// Minimum project name length.
pub const MIN_NAME_LEN: usize = 3;

/// Check that `name` works as a directory name and a Go module path.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| K7Error::InvalidProjectName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.chars().count() < MIN_NAME_LEN {
        return Err(invalid("must be at least 3 characters"));
    }
    if name.starts_with('.') || name.starts_with('-') {
        return Err(invalid("must not start with '.' or '-'"));
    }
    if let Some(c) = name
        .chars()
        .find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(&format!("contains unsupported character '{c}'")));
    }
    Ok(())
}

/// Make sure `project_dir` exists and is empty.
///
/// An existing empty directory is reused; anything else at that path is an error.
pub fn prepare_project_dir(project_dir: &Path) -> Result<()> {
    if project_dir.exists() {
        let reusable =
            project_dir.is_dir() && std::fs::read_dir(project_dir)?.next().is_none();
        if !reusable {
            return Err(K7Error::ProjectExists(project_dir.to_path_buf()));
        }
        return Ok(());
    }

    std::fs::create_dir_all(project_dir)?;
    Ok(())
}

/// Compose the manifest for `context` and materialize it through `fs`.
///
/// Composition finishes before the first write, so selection errors never
/// touch the filesystem.
pub fn scaffold<F: Filesystem>(
    context: &ProjectContext,
    fs: &mut F,
) -> Result<(Manifest, MaterializeReport)> {
    scaffold_with(&Composer::new(context.layout()), context, fs)
}

/// [`scaffold`] with an explicit composer.
pub fn scaffold_with<F: Filesystem>(
    composer: &Composer,
    context: &ProjectContext,
    fs: &mut F,
) -> Result<(Manifest, MaterializeReport)> {
    let manifest = composer.compose(&context.selections())?;
    let report = Injector::new(context.absolute_path(), context).materialize(&manifest, fs)?;
    Ok((manifest, report))
}

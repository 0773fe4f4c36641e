//! Materialization of a manifest onto a filesystem.
//!
//! The [`Injector`] walks a [`Manifest`] strictly in order. For each entry it
//! creates the parent directories, renders the template against the parameter
//! context, and writes the result. The first failure stops the run; files
//! written for earlier entries stay on disk and nothing is rolled back.
//!
//! Rendering happens into memory before the destination is opened, so a
//! template that fails to parse or execute never leaves a truncated file.
//!
//! All writes go through the [`Filesystem`] trait: [`DiskFs`] for real runs,
//! [`DryRunFs`] to record what would be written without touching the disk.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::composer::Manifest;
use crate::context::ProjectContext;
use crate::error::{K7Error, Result};
use crate::templates::renderer::TemplateRenderer;

/// Mode for directories created on Unix (before umask).
pub const DIR_MODE: u32 = 0o770;

/// Where the injector writes.
pub trait Filesystem {
    /// Create `path` and any missing parents. Succeeds if it already exists.
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()>;

    /// Create or truncate `path` and write `contents` to it.
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFs;

impl Filesystem for DiskFs {
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(DIR_MODE);
        }
        builder.create(path)
    }

    fn write_file(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(contents)?;
        file.flush()
    }
}

/// A recorded filesystem operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    CreateDir(PathBuf),
    WriteFile { path: PathBuf, contents: Vec<u8> },
}

/// Records operations in memory instead of performing them.
#[derive(Debug, Default, Clone)]
pub struct DryRunFs {
    ops: Vec<FsOp>,
}

impl DryRunFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[FsOp] {
        &self.ops
    }

    /// Paths of every file that would have been written, in order.
    pub fn written_paths(&self) -> Vec<&Path> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                FsOp::WriteFile { path, .. } => Some(path.as_path()),
                FsOp::CreateDir(_) => None,
            })
            .collect()
    }

    /// Contents last written to `path`, if any.
    pub fn contents(&self, path: &Path) -> Option<&[u8]> {
        self.ops.iter().rev().find_map(|op| match op {
            FsOp::WriteFile { path: p, contents } if p == path => Some(contents.as_slice()),
            _ => None,
        })
    }
}

impl Filesystem for DryRunFs {
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        self.ops.push(FsOp::CreateDir(path.to_path_buf()));
        Ok(())
    }

    fn write_file(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.ops.push(FsOp::WriteFile {
            path: path.to_path_buf(),
            contents: contents.to_vec(),
        });
        Ok(())
    }
}

/// Outcome of a successful materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    pub base_path: PathBuf,
    /// Manifest paths written, in manifest order.
    pub files: Vec<String>,
}

pub struct Injector {
    base_path: PathBuf,
    data: Value,
    renderer: TemplateRenderer,
}

impl Injector {
    /// An injector writing under `base_path` with `context` frozen for the run.
    pub fn new(base_path: &Path, context: &ProjectContext) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
            data: context.to_value(),
            renderer: TemplateRenderer::new(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Render and write every entry of `manifest` in order, stopping at the first error.
    pub fn materialize<F: Filesystem>(
        &mut self,
        manifest: &Manifest,
        fs: &mut F,
    ) -> Result<MaterializeReport> {
        let mut files = Vec::with_capacity(manifest.len());

        for entry in manifest {
            let path = self.base_path.join(entry.file_path());

            if let Some(parent) = path.parent() {
                fs.create_dir_all(parent)
                    .map_err(|e| K7Error::DirectoryCreate {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
            }

            let rendered = self
                .renderer
                .render_file(entry.file_path(), entry.bytes(), &self.data)?;

            fs.write_file(&path, rendered.as_bytes())
                .map_err(|e| K7Error::FileCreate {
                    path: path.clone(),
                    source: e,
                })?;

            tracing::debug!("wrote {}", path.display());
            files.push(entry.file_path().to_string());
        }

        tracing::info!(
            "materialized {} file(s) under {}",
            files.len(),
            self.base_path.display()
        );
        Ok(MaterializeReport {
            base_path: self.base_path.clone(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::Composer;
    use crate::generator::Injectable;
    use crate::variant::Selections;

    fn context(dir: &Path) -> ProjectContext {
        ProjectContext::new("demo", dir, &Selections::default())
    }

    fn manifest(entries: Vec<Injectable>) -> Manifest {
        Manifest::from_entries(entries).unwrap()
    }

    #[test]
    fn test_materialize_renders_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut injector = Injector::new(dir.path(), &context(dir.path()));
        let report = injector
            .materialize(
                &manifest(vec![Injectable::new("cmd/app/main.go", "package {{project_name}}\n")]),
                &mut DiskFs,
            )
            .unwrap();
        assert_eq!(report.files, vec!["cmd/app/main.go".to_string()]);
        let written = std::fs::read_to_string(dir.path().join("cmd/app/main.go")).unwrap();
        assert_eq!(written, "package demo\n");
    }

    #[test]
    fn test_materialize_creates_every_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Composer::default().compose(&Selections::default()).unwrap();
        let mut injector = Injector::new(dir.path(), &context(dir.path()));
        injector.materialize(&manifest, &mut DiskFs).unwrap();

        for path in manifest.file_paths() {
            let full = dir.path().join(path);
            assert!(full.is_file(), "missing {path}");
            let mut parent = full.parent();
            while let Some(p) = parent {
                if p == dir.path() {
                    break;
                }
                assert!(p.is_dir(), "missing directory {}", p.display());
                parent = p.parent();
            }
        }
    }

    #[test]
    fn test_materialize_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "a much longer previous body").unwrap();
        let mut injector = Injector::new(dir.path(), &context(dir.path()));
        injector
            .materialize(&manifest(vec![Injectable::new("README.md", "new")]), &mut DiskFs)
            .unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("README.md")).unwrap(), "new");
    }

    #[test]
    fn test_parse_error_halts_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut injector = Injector::new(dir.path(), &context(dir.path()));
        let err = injector
            .materialize(
                &manifest(vec![
                    Injectable::new("first.go", "ok"),
                    Injectable::new("broken/bad.go", "{{project_name"),
                    Injectable::new("third.go", "never"),
                ]),
                &mut DiskFs,
            )
            .unwrap_err();

        match err {
            K7Error::TemplateParse { path, .. } => assert_eq!(path, "broken/bad.go"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(dir.path().join("first.go").exists());
        assert!(!dir.path().join("broken/bad.go").exists());
        assert!(!dir.path().join("third.go").exists());
    }

    #[test]
    fn test_exec_error_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut injector = Injector::new(dir.path(), &context(dir.path()));
        let err = injector
            .materialize(
                &manifest(vec![Injectable::new("main.go", "package main // {{missing}}")]),
                &mut DiskFs,
            )
            .unwrap_err();
        assert!(matches!(err, K7Error::TemplateExec { ref path, .. } if path == "main.go"));
        assert!(!dir.path().join("main.go").exists());
    }

    #[test]
    fn test_directory_create_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed.
        std::fs::write(dir.path().join("internal"), "").unwrap();
        let mut injector = Injector::new(dir.path(), &context(dir.path()));
        let err = injector
            .materialize(
                &manifest(vec![Injectable::new("internal/server/server.go", "x")]),
                &mut DiskFs,
            )
            .unwrap_err();
        assert!(matches!(err, K7Error::DirectoryCreate { .. }));
    }

    #[test]
    fn test_file_create_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("main.go")).unwrap();
        let mut injector = Injector::new(dir.path(), &context(dir.path()));
        let err = injector
            .materialize(&manifest(vec![Injectable::new("main.go", "x")]), &mut DiskFs)
            .unwrap_err();
        match err {
            K7Error::FileCreate { path, .. } => assert_eq!(path, dir.path().join("main.go")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dry_run_records_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("demo");
        let mut fs = DryRunFs::new();
        let mut injector = Injector::new(&target, &context(&target));
        injector
            .materialize(&manifest(vec![Injectable::new("a/b.go", "{{project_name}}")]), &mut fs)
            .unwrap();

        assert!(!target.exists());
        assert_eq!(fs.ops()[0], FsOp::CreateDir(target.join("a")));
        assert_eq!(fs.written_paths(), vec![target.join("a/b.go").as_path()]);
        assert_eq!(fs.contents(&target.join("a/b.go")), Some(&b"demo"[..]));
    }

    #[cfg(unix)]
    #[test]
    fn test_directories_are_not_world_accessible() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let mut injector = Injector::new(dir.path(), &context(dir.path()));
        injector
            .materialize(&manifest(vec![Injectable::new("internal/x.go", "x")]), &mut DiskFs)
            .unwrap();
        let mode = std::fs::metadata(dir.path().join("internal"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o007, 0);
    }
}

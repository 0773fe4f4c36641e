//! Composition of every generator's output into one manifest.
//!
//! The [`Composer`] runs its generators in a fixed order and concatenates their
//! injectables. The order only keeps output reproducible across runs; no
//! generator reads another's output.
//!
//! | # | Collection | Variant from | Base path |
//! |---|---|---|---|
//! | 1 | storage | storage | `layout.storage` |
//! | 2 | server | server | `layout.server` |
//! | 3 | main | server | project root |
//! | 4 | service | none | `layout.service` |
//! | 5 | entities | none | `layout.entities` |
//! | 6 | project | storage | project root |

use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::error::{K7Error, Result};
use crate::generator::{Generator, Injectable};
use crate::templates::embedded;
use crate::variant::{Concern, Selections};

/// The full, ordered file list for one project.
///
/// No two entries share a `file_path`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<Injectable>,
}

impl Manifest {
    /// Build a manifest, failing on the first duplicated output path.
    pub fn from_entries(entries: Vec<Injectable>) -> Result<Self> {
        if let Some(duplicate) = first_duplicate(&entries) {
            return Err(K7Error::ManifestCollision {
                path: duplicate.to_string(),
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Injectable] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn file_paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Injectable::file_path)
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a Injectable;
    type IntoIter = std::slice::Iter<'a, Injectable>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn first_duplicate(entries: &[Injectable]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .iter()
        .map(Injectable::file_path)
        .find(|path| !seen.insert(*path))
}

/// A generator plus the concern whose selection picks its variant.
#[derive(Debug, Clone)]
struct Stage {
    driver: Option<Concern>,
    generator: Generator,
}

#[derive(Debug, Clone)]
pub struct Composer {
    stages: Vec<Stage>,
}

impl Composer {
    /// The built-in collections, rooted per `layout`.
    pub fn new(layout: &LayoutConfig) -> Self {
        let stage = |driver, collection, base: &str| Stage {
            driver,
            generator: Generator::new(collection, base),
        };

        Self {
            stages: vec![
                stage(
                    Some(Concern::Storage),
                    embedded::STORAGE,
                    layout.base_for(Concern::Storage),
                ),
                stage(
                    Some(Concern::Server),
                    embedded::SERVER,
                    layout.base_for(Concern::Server),
                ),
                stage(Some(Concern::Server), embedded::MAIN, ""),
                stage(None, embedded::SERVICE, layout.base_for(Concern::Service)),
                stage(None, embedded::ENTITIES, layout.base_for(Concern::Entities)),
                stage(Some(Concern::Storage), embedded::PROJECT, ""),
            ],
        }
    }

    /// A composer over explicit generators, run in the given order.
    ///
    /// `driver` names the concern whose selected tag is passed to the generator.
    pub fn from_generators(generators: Vec<(Option<Concern>, Generator)>) -> Self {
        Self {
            stages: generators
                .into_iter()
                .map(|(driver, generator)| Stage { driver, generator })
                .collect(),
        }
    }

    /// Run every generator in order and assemble the manifest.
    ///
    /// Has no side effects. A variant error from any generator aborts the
    /// whole composition.
    pub fn compose(&self, selections: &Selections) -> Result<Manifest> {
        let mut entries = Vec::new();
        for stage in &self.stages {
            let tag = stage.driver.and_then(|c| selections.tag_for(c));
            entries.extend(stage.generator.generate(tag)?);
        }

        let manifest = Manifest::from_entries(entries)?;
        tracing::info!(
            "composed {} file(s) from {} collection(s)",
            manifest.len(),
            self.stages.len()
        );
        Ok(manifest)
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetCollection, EmbeddedAsset, Layout};

    #[test]
    fn test_compose_default_selection() {
        let manifest = Composer::default().compose(&Selections::default()).unwrap();
        let paths: Vec<&str> = manifest.file_paths().collect();
        for expected in [
            "internal/storage/storage.go",
            "internal/storage/postgres/storage.go",
            "internal/storage/postgres/migrations/2000000000000_init.sql",
            "main.go",
            "internal/server/server.go",
            "internal/server/router.go",
            "internal/service/service.go",
            "internal/entities/foo/foo.go",
            ".env",
            "Makefile",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
        assert!(paths.iter().all(|p| !p.contains("mysql") && !p.contains("huma")));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let composer = Composer::default();
        let first = composer.compose(&Selections::default()).unwrap();
        let second = composer.compose(&Selections::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compose_has_no_duplicate_paths() {
        let manifest = Composer::default().compose(&Selections::default()).unwrap();
        let unique: HashSet<&str> = manifest.file_paths().collect();
        assert_eq!(unique.len(), manifest.len());
    }

    #[test]
    fn test_compose_order_follows_stages() {
        let manifest = Composer::default().compose(&Selections::default()).unwrap();
        let position = |path: &str| manifest.file_paths().position(|p| p == path).unwrap();
        assert!(position("internal/storage/storage.go") < position("internal/server/router.go"));
        assert!(position("internal/server/router.go") < position("main.go"));
        assert!(position("main.go") < position("internal/service/service.go"));
        assert!(position("internal/service/service.go") < position("internal/entities/foo/foo.go"));
        assert!(position("internal/entities/foo/foo.go") < position("README.md"));
    }

    #[test]
    fn test_compose_respects_layout() {
        let layout = LayoutConfig {
            server: "internal/http".into(),
            ..LayoutConfig::default()
        };
        let manifest = Composer::new(&layout).compose(&Selections::default()).unwrap();
        let paths: Vec<&str> = manifest.file_paths().collect();
        assert!(paths.contains(&"internal/http/router.go"));
        assert!(!paths.contains(&"internal/server/router.go"));
    }

    #[test]
    fn test_collision_is_fatal() {
        const A: &[EmbeddedAsset] = &[EmbeddedAsset {
            path: "a/x.go.tmpl",
            body: "a",
        }];
        const B: &[EmbeddedAsset] = &[EmbeddedAsset {
            path: "b/x.go.tmpl",
            body: "b",
        }];
        let composer = Composer::from_generators(vec![
            (
                None,
                Generator::new(
                    AssetCollection::new(Concern::Service, "a", Layout::Universal, A),
                    "shared",
                ),
            ),
            (
                None,
                Generator::new(
                    AssetCollection::new(Concern::Entities, "b", Layout::Universal, B),
                    "shared",
                ),
            ),
        ]);
        let err = composer.compose(&Selections::default()).unwrap_err();
        match err {
            K7Error::ManifestCollision { path } => assert_eq!(path, "shared/x.go"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_manifest_from_entries_accepts_unique() {
        let manifest = Manifest::from_entries(vec![
            Injectable::new("a.go", "a"),
            Injectable::new("b.go", "b"),
        ])
        .unwrap();
        assert_eq!(manifest.len(), 2);
        assert!(!manifest.is_empty());
    }
}

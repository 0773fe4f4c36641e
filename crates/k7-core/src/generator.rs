//! Generators turn one asset collection into manifest entries.
//!
//! A [`Generator`] pairs an [`AssetCollection`] with the output base path its
//! files land under. For each asset selected for the requested variant the
//! output path is
//!
//! ```text
//! join(base_path, strip_tmpl(remap(relative_asset_path)))
//! ```
//!
//! where `remap` drops the variant directory for [`Remap::Strip`] rules and
//! keeps it for [`Remap::Keep`] rules.

use crate::assets::{Asset, AssetCollection, Remap};
use crate::error::{K7Error, Result};

/// Suffix every embedded template carries.
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// One output file: a project-relative path and its raw template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injectable {
    file_path: String,
    bytes: Vec<u8>,
}

impl Injectable {
    pub fn new(file_path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_path: file_path.into(),
            bytes: bytes.into(),
        }
    }

    /// `/`-separated path relative to the project root.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Debug, Clone)]
pub struct Generator {
    collection: AssetCollection,
    base_path: String,
}

impl Generator {
    /// `base_path` is relative to the project root; empty means the root itself.
    pub fn new(collection: AssetCollection, base_path: &str) -> Self {
        Self {
            collection,
            base_path: base_path.trim_matches('/').to_string(),
        }
    }

    pub fn collection(&self) -> &AssetCollection {
        &self.collection
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Produce the injectables for `variant`, in collection order.
    ///
    /// Unknown variants are rejected before the collection is enumerated.
    pub fn generate(&self, variant: Option<&str>) -> Result<Vec<Injectable>> {
        let assets = self.collection.enumerate(variant)?;

        let injectables = assets
            .iter()
            .map(|asset| Ok(Injectable::new(self.output_path(asset)?, asset.body)))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "{} generated {} file(s) under '{}'",
            self.collection.root(),
            injectables.len(),
            self.base_path
        );
        Ok(injectables)
    }

    fn output_path(&self, asset: &Asset) -> Result<String> {
        let relative = match asset.variant {
            Some(rule) if rule.remap == Remap::Strip => asset
                .relative
                .split_once('/')
                .map_or(asset.relative, |(_, rest)| rest),
            _ => asset.relative,
        };

        let stripped = relative
            .strip_suffix(TEMPLATE_SUFFIX)
            .filter(|p| !p.is_empty() && !p.ends_with('/'))
            .ok_or_else(|| K7Error::AssetRead {
                path: asset.path.to_string(),
                reason: format!("missing '{TEMPLATE_SUFFIX}' suffix"),
            })?;

        Ok(join(&self.base_path, stripped))
    }
}

fn join(base: &str, relative: &str) -> String {
    if base.is_empty() {
        relative.to_string()
    } else {
        format!("{base}/{relative}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{EmbeddedAsset, Layout, VariantRule};
    use crate::templates::embedded;
    use crate::variant::Concern;

    const HUMA: &[VariantRule] = &[VariantRule {
        tag: "huma",
        subtree: "huma",
        remap: Remap::Strip,
    }];

    const SERVER_ASSETS: &[EmbeddedAsset] = &[
        EmbeddedAsset {
            path: "files/server/huma/router.go.tmpl",
            body: "router",
        },
        EmbeddedAsset {
            path: "files/server/huma/handler/health/handler.go.tmpl",
            body: "health",
        },
    ];

    fn file_paths(injectables: &[Injectable]) -> Vec<&str> {
        injectables.iter().map(Injectable::file_path).collect()
    }

    #[test]
    fn test_keep_rule_preserves_variant_segment() {
        let generator = Generator::new(embedded::STORAGE, "internal/storage");
        let injectables = generator.generate(Some("postgres")).unwrap();
        let paths = file_paths(&injectables);
        assert!(paths.contains(&"internal/storage/postgres/storage.go"));
        assert!(paths.contains(&"internal/storage/storage.go"));
        assert!(!paths.contains(&"internal/storage/postgres/postgres/storage.go"));
    }

    #[test]
    fn test_strip_rule_drops_variant_segment() {
        let collection = AssetCollection::new(
            Concern::Server,
            "files/server",
            Layout::Variants(HUMA),
            SERVER_ASSETS,
        );
        let generator = Generator::new(collection, "internal/server/");
        let injectables = generator.generate(Some("huma")).unwrap();
        assert_eq!(
            file_paths(&injectables),
            vec![
                "internal/server/handler/health/handler.go",
                "internal/server/router.go"
            ]
        );
        assert_eq!(injectables[1].bytes(), b"router");
    }

    #[test]
    fn test_empty_base_path_targets_project_root() {
        let generator = Generator::new(embedded::MAIN, "");
        let injectables = generator.generate(Some("huma")).unwrap();
        assert_eq!(file_paths(&injectables), vec!["main.go"]);
    }

    #[test]
    fn test_suffix_stripped_exactly_once() {
        const DOUBLE: &[EmbeddedAsset] = &[EmbeddedAsset {
            path: "files/entities/example.tmpl.tmpl",
            body: "",
        }];
        let collection =
            AssetCollection::new(Concern::Entities, "files/entities", Layout::Universal, DOUBLE);
        let injectables = Generator::new(collection, "internal/entities")
            .generate(None)
            .unwrap();
        assert_eq!(injectables[0].file_path(), "internal/entities/example.tmpl");
    }

    #[test]
    fn test_missing_suffix_is_asset_error() {
        const PLAIN: &[EmbeddedAsset] = &[EmbeddedAsset {
            path: "files/entities/foo.go",
            body: "",
        }];
        let collection =
            AssetCollection::new(Concern::Entities, "files/entities", Layout::Universal, PLAIN);
        let err = Generator::new(collection, "internal/entities")
            .generate(None)
            .unwrap_err();
        assert!(matches!(err, K7Error::AssetRead { .. }));
    }

    #[test]
    fn test_unknown_variant_before_enumeration() {
        let generator = Generator::new(embedded::STORAGE, "internal/storage");
        let err = generator.generate(Some("nonexistent-variant")).unwrap_err();
        assert!(matches!(err, K7Error::UnknownVariant { .. }));
    }

    #[test]
    fn test_universal_generator_rejects_tag() {
        let generator = Generator::new(embedded::SERVICE, "internal/service");
        let err = generator.generate(Some("nonexistent-variant")).unwrap_err();
        assert!(matches!(err, K7Error::UnknownVariant { ref tag, .. } if tag == "nonexistent-variant"));
    }

    #[test]
    fn test_generate_is_pure() {
        let generator = Generator::new(embedded::SERVER, "internal/server");
        let first = generator.generate(Some("huma")).unwrap();
        let second = generator.generate(Some("huma")).unwrap();
        assert_eq!(first, second);
    }
}

//! Embedded, read-only template collections.
//!
//! An [`AssetCollection`] is a `'static` table of template files for one
//! concern, compiled into the binary (see [`crate::templates::embedded`]).
//! Asset paths have the form `<root>/[<variant>/]<relative-path>.tmpl`.
//!
//! A collection declares its [`Layout`]. Universal collections yield every
//! asset. Variant collections declare one [`VariantRule`] per supported tag;
//! the directory directly under the root named by a rule's `subtree` holds that
//! variant's files, and only the selected subtree is yielded. Files outside
//! every variant subtree are shared and always yielded.

use crate::error::{K7Error, Result};
use crate::variant::{unknown_variant, Concern};

/// A template file baked into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedAsset {
    pub path: &'static str,
    pub body: &'static str,
}

/// What happens to a variant's directory segment in the output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remap {
    /// `storage/postgres/storage.go.tmpl` → `<base>/postgres/storage.go`
    Keep,
    /// `server/huma/router.go.tmpl` → `<base>/router.go`
    Strip,
}

/// Maps a variant tag to the subtree it includes and how that subtree is remapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantRule {
    pub tag: &'static str,
    pub subtree: &'static str,
    pub remap: Remap,
}

#[derive(Debug, Clone, Copy)]
pub enum Layout {
    /// A single template set; every asset is yielded for any selection.
    Universal,
    /// Directories under the root named by these rules are variant subtrees.
    Variants(&'static [VariantRule]),
}

/// An asset selected for the requested variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Full asset path, including the collection root.
    pub path: &'static str,
    /// Path below the collection root, still carrying the variant segment and `.tmpl`.
    pub relative: &'static str,
    /// The rule that admitted this asset, if it lives in a variant subtree.
    pub variant: Option<VariantRule>,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct AssetCollection {
    concern: Concern,
    root: &'static str,
    layout: Layout,
    assets: &'static [EmbeddedAsset],
}

impl AssetCollection {
    pub const fn new(
        concern: Concern,
        root: &'static str,
        layout: Layout,
        assets: &'static [EmbeddedAsset],
    ) -> Self {
        Self {
            concern,
            root,
            layout,
            assets,
        }
    }

    pub fn concern(&self) -> Concern {
        self.concern
    }

    pub fn root(&self) -> &'static str {
        self.root
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Tags this collection accepts. Empty for universal collections.
    pub fn variant_tags(&self) -> Vec<&'static str> {
        match self.layout {
            Layout::Universal => Vec::new(),
            Layout::Variants(rules) => rules.iter().map(|r| r.tag).collect(),
        }
    }

    /// Resolve the requested tag against the declared rules.
    ///
    /// Universal collections accept no tag at all. Variant collections require
    /// one of their declared tags.
    pub fn resolve(&self, variant: Option<&str>) -> Result<Option<VariantRule>> {
        let rules = match (self.layout, variant) {
            (Layout::Universal, None) => return Ok(None),
            (Layout::Universal, Some(tag)) => {
                return Err(unknown_variant(self.concern, tag, std::iter::empty()));
            }
            (Layout::Variants(rules), _) => rules,
        };
        let tag = variant.unwrap_or_default();
        rules
            .iter()
            .find(|r| r.tag == tag)
            .copied()
            .map(Some)
            .ok_or_else(|| unknown_variant(self.concern, tag, rules.iter().map(|r| r.tag)))
    }

    /// List the assets for `variant`, ordered by path segment.
    ///
    /// Sibling variant subtrees are skipped. Bodies are returned verbatim.
    pub fn enumerate(&self, variant: Option<&str>) -> Result<Vec<Asset>> {
        let selected = self.resolve(variant)?;

        let mut assets = Vec::with_capacity(self.assets.len());
        for asset in self.assets {
            let relative = self.relative_path(asset.path)?;

            let owner = match self.layout {
                Layout::Universal => None,
                Layout::Variants(rules) => relative
                    .split_once('/')
                    .and_then(|(first, _)| rules.iter().find(|r| r.subtree == first)),
            };
            let variant = match (owner, selected) {
                (Some(rule), Some(sel)) if rule.subtree == sel.subtree => Some(sel),
                (Some(_), _) => continue,
                (None, _) => None,
            };

            assets.push(Asset {
                path: asset.path,
                relative,
                variant,
                body: asset.body,
            });
        }

        assets.sort_by(|a, b| a.path.split('/').cmp(b.path.split('/')));
        Ok(assets)
    }

    fn relative_path(&self, path: &'static str) -> Result<&'static str> {
        path.strip_prefix(self.root)
            .and_then(|p| p.strip_prefix('/'))
            .filter(|p| !p.is_empty())
            .ok_or_else(|| K7Error::AssetRead {
                path: path.to_string(),
                reason: format!("not inside collection root '{}'", self.root),
            })
    }
}

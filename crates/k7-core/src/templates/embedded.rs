//! Compile-time embedded template collections.
//!
//! Each entry loads a template file from `crates/k7-core/templates/` via
//! [`include_str!`]; the asset path doubles as the file's location below that
//! directory, so a wrong path fails the build.
//!
//! ## Adding a template
//!
//! 1. Place the `.tmpl` file under `templates/files/<collection>/`
//!    (inside `<variant>/` if it belongs to one variant only)
//! 2. Add an `asset!` line to the collection's table below
//! 3. Keep the table sorted; enumeration sorts anyway, but diffs stay readable
//!
//! ## Warning
//!
//! Do NOT add a template whose output path another collection already produces.
//! The composer rejects such manifests with `ManifestCollision`.

use crate::assets::{AssetCollection, EmbeddedAsset, Layout, Remap, VariantRule};
use crate::variant::Concern;

macro_rules! asset {
    ($path:literal) => {
        EmbeddedAsset {
            path: $path,
            body: include_str!(concat!("../../templates/", $path)),
        }
    };
}

// -------------------------------------------------------
// Storage: shared interface + one implementation per DBMS
// -------------------------------------------------------

const STORAGE_RULES: &[VariantRule] = &[VariantRule {
    tag: "postgres",
    subtree: "postgres",
    remap: Remap::Keep,
}];

const STORAGE_ASSETS: &[EmbeddedAsset] = &[
    asset!("files/storage/postgres/foo/foo.go.tmpl"),
    asset!("files/storage/postgres/migrations/2000000000000_init.sql.tmpl"),
    asset!("files/storage/postgres/shared/shared.go.tmpl"),
    asset!("files/storage/postgres/storage.go.tmpl"),
    asset!("files/storage/storage.go.tmpl"),
];

pub const STORAGE: AssetCollection = AssetCollection::new(
    Concern::Storage,
    "files/storage",
    Layout::Variants(STORAGE_RULES),
    STORAGE_ASSETS,
);

// -------------------------------------------------------
// Server: one HTTP layer per framework, flattened into the base path
// -------------------------------------------------------

const SERVER_RULES: &[VariantRule] = &[VariantRule {
    tag: "huma",
    subtree: "huma",
    remap: Remap::Strip,
}];

const SERVER_ASSETS: &[EmbeddedAsset] = &[
    asset!("files/server/huma/handler/foo/handler.go.tmpl"),
    asset!("files/server/huma/handler/foo/routes.go.tmpl"),
    asset!("files/server/huma/handler/health/handler.go.tmpl"),
    asset!("files/server/huma/handler/health/routes.go.tmpl"),
    asset!("files/server/huma/handler/shared/auth.go.tmpl"),
    asset!("files/server/huma/handler/shared/schema.go.tmpl"),
    asset!("files/server/huma/middleware/auth.go.tmpl"),
    asset!("files/server/huma/middleware/shared.go.tmpl"),
    asset!("files/server/huma/router.go.tmpl"),
    asset!("files/server/huma/server.go.tmpl"),
];

pub const SERVER: AssetCollection = AssetCollection::new(
    Concern::Server,
    "files/server",
    Layout::Variants(SERVER_RULES),
    SERVER_ASSETS,
);

const MAIN_ASSETS: &[EmbeddedAsset] = &[asset!("files/main/huma/main.go.tmpl")];

/// The program entrypoint, which depends on the framework.
pub const MAIN: AssetCollection = AssetCollection::new(
    Concern::Server,
    "files/main",
    Layout::Variants(SERVER_RULES),
    MAIN_ASSETS,
);

// -------------------------------------------------------
// Service and entity layers (framework and DBMS agnostic)
// -------------------------------------------------------

const SERVICE_ASSETS: &[EmbeddedAsset] = &[
    asset!("files/service/domain/foo/foo.go.tmpl"),
    asset!("files/service/domain/health/health.go.tmpl"),
    asset!("files/service/domain/service.go.tmpl"),
    asset!("files/service/service.go.tmpl"),
];

pub const SERVICE: AssetCollection = AssetCollection::new(
    Concern::Service,
    "files/service",
    Layout::Universal,
    SERVICE_ASSETS,
);

const ENTITIES_ASSETS: &[EmbeddedAsset] = &[
    asset!("files/entities/foo/foo.go.tmpl"),
    asset!("files/entities/shared/timestamps.go.tmpl"),
];

pub const ENTITIES: AssetCollection = AssetCollection::new(
    Concern::Entities,
    "files/entities",
    Layout::Universal,
    ENTITIES_ASSETS,
);

// -------------------------------------------------------
// Project root: tooling files plus the DBMS-specific env file
// -------------------------------------------------------

const PROJECT_RULES: &[VariantRule] = &[VariantRule {
    tag: "postgres",
    subtree: "postgres",
    remap: Remap::Strip,
}];

const PROJECT_ASSETS: &[EmbeddedAsset] = &[
    asset!("files/project/.air.toml.tmpl"),
    asset!("files/project/.gitignore.tmpl"),
    asset!("files/project/Makefile.tmpl"),
    asset!("files/project/README.md.tmpl"),
    asset!("files/project/postgres/.env.tmpl"),
];

pub const PROJECT: AssetCollection = AssetCollection::new(
    Concern::Project,
    "files/project",
    Layout::Variants(PROJECT_RULES),
    PROJECT_ASSETS,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_embedded() {
        for collection in [STORAGE, SERVER, MAIN, SERVICE, ENTITIES, PROJECT] {
            let tag = collection.variant_tags().first().copied();
            let assets = collection.enumerate(tag).unwrap();
            assert!(!assets.is_empty(), "{} is empty", collection.root());
            for asset in assets {
                assert!(asset.path.ends_with(".tmpl"), "{}", asset.path);
                assert!(!asset.body.trim().is_empty(), "{} is blank", asset.path);
            }
        }
    }

    #[test]
    fn test_server_and_main_share_framework_tags() {
        assert_eq!(SERVER.variant_tags(), MAIN.variant_tags());
        assert_eq!(STORAGE.variant_tags(), PROJECT.variant_tags());
    }
}

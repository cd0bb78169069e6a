//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use distromap_core::catalog::loader::load_target_catalog;
use distromap_core::config::MapConfig;
use distromap_core::resolver::Resolver;
use distromap_core::rules::RuleSet;

// ---------------------------------------------------------------------------
// Fixture path resolution
// ---------------------------------------------------------------------------

/// Resolve `tests/fixtures/{name}` relative to the workspace root.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .join("../../tests/fixtures")
        .join(name)
        .canonicalize()
        .unwrap_or_else(|_| {
            Path::new(manifest_dir)
                .join("../../tests/fixtures")
                .join(name)
        })
}

/// A run config over `tests/fixtures/small/{source}` and `{target}`.
pub fn small_config(source: &str, target: &str) -> MapConfig {
    MapConfig {
        source_path: fixture_path("small").join(source).to_string_lossy().to_string(),
        target_path: fixture_path("small").join(target).to_string_lossy().to_string(),
        ..Default::default()
    }
}

/// A resolver over the small text target catalog with the built-in rules.
pub fn small_resolver() -> Resolver {
    let catalog = load_target_catalog(&fixture_path("small/gentoo_pkgs.txt")).unwrap();
    Resolver::from_catalog(&catalog, RuleSet::default())
}

//! Catalog loading and lookup index tests.

mod common;

use std::path::Path;

use common::*;
use distromap_core::catalog::loader::{load_source_catalog, load_target_catalog};
use distromap_core::catalog::{LookupIndex, PackageLookup};
use distromap_core::rules::RuleSet;
use distromap_core::MapError;

#[test]
fn text_source_skips_blank_lines() {
    let source = load_source_catalog(&fixture_path("small/clearlinux_pkgs.txt")).unwrap();
    assert_eq!(source.len(), 10);
    assert!(source.contains("qt6base"));
}

#[test]
fn json_source_drops_empty_names() {
    let source = load_source_catalog(&fixture_path("small/clearlinux_pkgs.json")).unwrap();
    assert_eq!(source.len(), 5);
    assert!(!source.contains(""));
}

#[test]
fn text_target_skips_malformed_lines() {
    let target = load_target_catalog(&fixture_path("small/gentoo_pkgs.txt")).unwrap();
    assert_eq!(target.package_count(), 11);
    assert!(target.packages_in("").is_none());
    assert!(target
        .packages_in("dev-python")
        .is_some_and(|names| names.contains("PyYAML")));
}

#[test]
fn json_target_loads_categories() {
    let target = load_target_catalog(&fixture_path("small/gentoo_pkgs.json")).unwrap();
    assert_eq!(target.category_count(), 5);
    assert_eq!(target.package_count(), 6);
}

#[test]
fn missing_file_error_names_path() {
    let err = load_target_catalog(Path::new("/nonexistent/gentoo_pkgs.txt")).unwrap_err();
    assert!(matches!(err, MapError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/gentoo_pkgs.txt"));
}

#[test]
fn invalid_json_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"dev-libs\": \"not-a-list\"}").unwrap();
    let err = load_target_catalog(&path).unwrap_err();
    assert!(matches!(err, MapError::Json { .. }));
}

#[test]
fn index_excludes_non_optimizable_categories() {
    let target = load_target_catalog(&fixture_path("small/gentoo_pkgs.txt")).unwrap();
    let rules = RuleSet::default();
    let index = LookupIndex::build(&target, &rules.non_optimizable);
    assert!(index.exists("editor"));
    assert!(index.eligible_categories("editor").is_empty());
    assert_eq!(
        index.eligible_categories("protobuf"),
        ["dev-go", "dev-libs", "dev-python"]
    );
    assert_eq!(index.spelling_in("test-simple", "dev-perl"), Some("Test-Simple"));
}

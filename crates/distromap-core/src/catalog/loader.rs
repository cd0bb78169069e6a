//! Plain-data catalog loaders for text lists and JSON documents.
//!
//! Text sources carry one entry per line: a bare package name for the source
//! catalog, `category/name` for the target catalog. JSON sources carry an
//! array of names or an object of `category → [names]` respectively. A file
//! is treated as JSON when its extension is `.json`.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};

use crate::catalog::{SourceCatalog, TargetCatalog};
use crate::error::MapError;

/// On-disk layout of a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Text,
    Json,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Split a `category/name` entry at the first `/`.
///
/// Returns `None` when the separator is missing or either side is empty.
pub fn split_entry(entry: &str) -> Option<(&str, &str)> {
    let (category, name) = entry.split_once('/')?;
    if category.is_empty() || name.is_empty() {
        return None;
    }
    Some((category, name))
}

pub fn parse_source_text(content: &str) -> SourceCatalog {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_source_json(content: &str) -> Result<SourceCatalog, serde_json::Error> {
    let names: Vec<String> = serde_json::from_str(content)?;
    Ok(names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect())
}

/// Parse `category/name` lines, skipping blank and malformed ones.
pub fn parse_target_text(content: &str) -> TargetCatalog {
    let mut catalog = TargetCatalog::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match split_entry(line) {
            Some((category, name)) => {
                catalog.insert(category, name);
            }
            None => warn!("skipping malformed catalog line {}: {line:?}", lineno + 1),
        }
    }
    catalog
}

pub fn parse_target_json(content: &str) -> Result<TargetCatalog, serde_json::Error> {
    let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(content)?;
    let mut catalog = TargetCatalog::new();
    for (category, names) in &raw {
        for name in names {
            let (category, name) = (category.trim(), name.trim());
            if category.is_empty() || name.is_empty() {
                warn!("skipping empty catalog entry {category:?}/{name:?}");
                continue;
            }
            catalog.insert(category, name);
        }
    }
    Ok(catalog)
}

fn read_catalog(path: &Path, what: &'static str) -> Result<String, MapError> {
    std::fs::read_to_string(path).map_err(|source| MapError::Read {
        what,
        path: path.to_path_buf(),
        source,
    })
}

/// Load the source catalog from a text or JSON file.
pub fn load_source_catalog(path: &Path) -> Result<SourceCatalog, MapError> {
    let content = read_catalog(path, "source catalog")?;
    let catalog = match CatalogFormat::from_path(path) {
        CatalogFormat::Text => parse_source_text(&content),
        CatalogFormat::Json => parse_source_json(&content).map_err(|source| MapError::Json {
            what: "source catalog",
            path: path.to_path_buf(),
            source,
        })?,
    };
    debug!(
        "loaded {} source packages from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

/// Load the target catalog from a text or JSON file.
pub fn load_target_catalog(path: &Path) -> Result<TargetCatalog, MapError> {
    let content = read_catalog(path, "target catalog")?;
    let catalog = match CatalogFormat::from_path(path) {
        CatalogFormat::Text => parse_target_text(&content),
        CatalogFormat::Json => parse_target_json(&content).map_err(|source| MapError::Json {
            what: "target catalog",
            path: path.to_path_buf(),
            source,
        })?,
    };
    debug!(
        "loaded {} target packages in {} categories from {}",
        catalog.package_count(),
        catalog.category_count(),
        path.display()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("data/pkgs.json")),
            CatalogFormat::Json
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("data/pkgs.JSON")),
            CatalogFormat::Json
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("data/pkgs.txt")),
            CatalogFormat::Text
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("pkgs")),
            CatalogFormat::Text
        );
    }

    #[test]
    fn split_entry_first_separator() {
        assert_eq!(split_entry("dev-libs/foo"), Some(("dev-libs", "foo")));
        assert_eq!(split_entry("dev-libs/foo/bar"), Some(("dev-libs", "foo/bar")));
        assert_eq!(split_entry("nocategory"), None);
        assert_eq!(split_entry("/foo"), None);
        assert_eq!(split_entry("dev-libs/"), None);
    }

    #[test]
    fn source_text_trims_and_skips_blanks() {
        let catalog = parse_source_text("zlib\n  SDL \n\nzlib\n");
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("SDL"));
    }

    #[test]
    fn target_text_skips_malformed_lines() {
        let catalog = parse_target_text("dev-libs/glib\nbogus\n\nmedia-libs/lcms\n/empty\n");
        assert_eq!(catalog.package_count(), 2);
        assert_eq!(catalog.category_count(), 2);
    }

    #[test]
    fn target_entries_joined_from_a_list() {
        let entries = ["dev-libs/glib", "nocategory", "sys-libs/zlib"];
        let catalog = parse_target_text(&entries.join("\n"));
        assert_eq!(catalog.package_count(), 2);
        assert!(catalog.packages_in("sys-libs").is_some());
    }

    #[test]
    fn target_json_keeps_spelling() {
        let catalog = parse_target_json(r#"{"dev-python": ["PyQt5", ""]}"#).unwrap();
        let names = catalog.packages_in("dev-python").unwrap();
        assert_eq!(names.len(), 1);
        assert!(names.contains("PyQt5"));
    }

    #[test]
    fn source_json_rejects_non_array() {
        assert!(parse_source_json(r#"{"a": 1}"#).is_err());
    }
}

//! Source and target package catalogs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub mod loader;
pub mod lookup_index;

pub use lookup_index::{LookupIndex, PackageLookup};

/// Flat set of source package names.
pub type SourceCatalog = BTreeSet<String>;

/// Category → package names, with spelling preserved per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetCatalog {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl TargetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `category/name` entry. Empty parts are rejected.
    pub fn insert(&mut self, category: &str, name: &str) -> bool {
        if category.is_empty() || name.is_empty() {
            return false;
        }
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string())
    }

    /// Iterate categories in ascending order with their package names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.categories.iter().map(|(c, names)| (c.as_str(), names))
    }

    pub fn packages_in(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn package_count(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<C: AsRef<str>, N: AsRef<str>> FromIterator<(C, N)> for TargetCatalog {
    fn from_iter<I: IntoIterator<Item = (C, N)>>(iter: I) -> Self {
        let mut catalog = TargetCatalog::new();
        for (category, name) in iter {
            catalog.insert(category.as_ref(), name.as_ref());
        }
        catalog
    }
}

//! Case-folded lookup index over one target catalog snapshot.

use std::collections::{BTreeSet, HashMap};

use crate::catalog::TargetCatalog;

/// Read-only package lookups used by the resolver.
pub trait PackageLookup: Send + Sync {
    /// Whether the name appears in any category, excluded ones included.
    fn exists(&self, name: &str) -> bool;

    /// Eligible categories containing the name, in a fixed order.
    fn eligible_categories(&self, name: &str) -> &[String];

    /// The name as spelled in `category`, if it appears there.
    fn spelling_in(&self, name: &str, category: &str) -> Option<&str>;
}

/// Dual HashMap index keyed by lowercase package name.
///
/// - `spellings`: folded name → category → original spelling
/// - `eligible`: folded name → eligible categories (ascending)
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    spellings: HashMap<String, HashMap<String, String>>,
    eligible: HashMap<String, Vec<String>>,
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl LookupIndex {
    /// Build the index, leaving `excluded` categories out of the eligible lists.
    pub fn build(catalog: &TargetCatalog, excluded: &BTreeSet<String>) -> Self {
        let mut index = Self::default();

        for (category, names) in catalog.iter() {
            let is_eligible = !excluded.contains(category);

            for name in names {
                let folded = fold(name);
                index
                    .spellings
                    .entry(folded.clone())
                    .or_default()
                    .insert(category.to_string(), name.clone());

                if is_eligible {
                    let categories = index.eligible.entry(folded).or_default();
                    // Two spellings of one name in a category still count once
                    if categories.last().map(String::as_str) != Some(category) {
                        categories.push(category.to_string());
                    }
                }
            }
        }
        index
    }

    /// Number of distinct case-folded names.
    pub fn name_count(&self) -> usize {
        self.spellings.len()
    }
}

impl PackageLookup for LookupIndex {
    fn exists(&self, name: &str) -> bool {
        self.spellings.contains_key(&fold(name))
    }

    fn eligible_categories(&self, name: &str) -> &[String] {
        self.eligible
            .get(&fold(name))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    fn spelling_in(&self, name: &str, category: &str) -> Option<&str> {
        self.spellings
            .get(&fold(name))
            .and_then(|by_category| by_category.get(category))
            .map(|s| s.as_str())
    }
}

//! Data tables that steer resolution: overrides, prefix transforms,
//! category priority and excluded categories.
//!
//! The tables are plain data. [`RuleSet::default`] carries the built-in
//! tables; a JSON document can replace any subset of them.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

pub mod overrides;
pub mod priority;
pub mod transforms;

pub use overrides::OverrideTable;
pub use priority::CategoryPriority;
pub use transforms::{TransformOutcome, TransformRule, TransformRules};

/// Categories that gain nothing from compile-time optimisation.
pub const NON_OPTIMIZABLE_CATEGORIES: &[&str] = &[
    "acct-group",
    "acct-user",
    "app-alternatives",
    "app-dicts",
    "app-doc",
    "app-emacs",
    "app-vim",
    "app-voices",
    "app-xemacs",
    "media-fonts",
    "sec-keys",
    "virtual",
    "x11-themes",
];

/// Every table the resolver consults.
///
/// Fields missing from a JSON document keep their built-in value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub overrides: OverrideTable,
    pub transforms: TransformRules,
    pub priority: CategoryPriority,
    pub non_optimizable: BTreeSet<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            overrides: OverrideTable::builtin(),
            transforms: TransformRules::builtin(),
            priority: CategoryPriority::builtin(),
            non_optimizable: NON_OPTIMIZABLE_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl RuleSet {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Read a rule document from disk.
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let content = std::fs::read_to_string(path).map_err(|source| MapError::Read {
            what: "rule tables",
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| MapError::Json {
            what: "rule tables",
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn is_optimizable(&self, category: &str) -> bool {
        !self.non_optimizable.contains(category)
    }
}

//! Core data types and configuration for a mapping run.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Resolution step that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchSource {
    Override,
    Direct,
    Transformed,
    Unmatched,
}

impl MatchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Direct => "direct",
            Self::Transformed => "transformed",
            Self::Unmatched => "unmatched",
        }
    }
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mapping record for one source package.
///
/// Fields are declared in sorted key order so the serialised record is
/// stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Every `category/name` candidate, in index order.
    #[serde(default)]
    pub all_matches: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
    /// Chosen `category/name`, absent when nothing matched.
    #[serde(rename = "gentoo_match", default)]
    pub best_match: Option<String>,
}

impl MatchResult {
    /// The empty record: no match, zero confidence.
    pub fn unmatched() -> Self {
        Self {
            all_matches: Vec::new(),
            confidence: 0.0,
            best_match: None,
        }
    }

    /// A hand-curated match with full confidence.
    pub fn overridden(path: &str) -> Self {
        Self {
            all_matches: vec![path.to_string()],
            confidence: 1.0,
            best_match: Some(path.to_string()),
        }
    }

    pub fn is_match(&self) -> bool {
        self.best_match.is_some()
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::unmatched()
    }
}

/// A [`MatchResult`] together with the name it answers and the step that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub name: String,
    pub result: MatchResult,
    pub source: MatchSource,
}

/// Source package name → mapping record, sorted by name.
pub type Mapping = BTreeMap<String, MatchResult>;

/// Configuration for a mapping run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_source_path")]
    pub source_path: String,
    #[serde(default = "default_target_path")]
    pub target_path: String,
    pub output_path: Option<String>,
    /// JSON rule tables replacing the built-in ones.
    pub rules_path: Option<String>,
    /// Worker threads for resolution; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

fn default_source_path() -> String {
    "data/clearlinux_pkgs.txt".to_string()
}
fn default_target_path() -> String {
    "data/gentoo_pkgs.txt".to_string()
}
pub fn default_output_path() -> String {
    "data/pkg_mapping.json".to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            target_path: default_target_path(),
            output_path: None,
            rules_path: None,
            threads: None,
        }
    }
}

/// Counts describing a finished mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub overrides: usize,
    pub direct: usize,
    pub transformed: usize,
    /// Matches chosen among two or more candidates.
    pub ambiguous: usize,
}

impl MappingSummary {
    pub fn record(&mut self, resolution: &Resolution) {
        self.total += 1;
        match resolution.source {
            MatchSource::Override => self.overrides += 1,
            MatchSource::Direct => self.direct += 1,
            MatchSource::Transformed => self.transformed += 1,
            MatchSource::Unmatched => self.unmatched += 1,
        }
        if resolution.result.is_match() {
            self.matched += 1;
        }
        if resolution.result.all_matches.len() > 1 {
            self.ambiguous += 1;
        }
    }
}

/// Result of a mapping run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingReport {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub summary: MappingSummary,
    #[serde(default)]
    pub mapping: Mapping,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for MappingReport {
    fn default() -> Self {
        Self {
            version: default_version(),
            metadata: HashMap::new(),
            summary: MappingSummary::default(),
            mapping: Mapping::new(),
        }
    }
}

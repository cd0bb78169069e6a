//! Package name resolution: override → direct → transformed → no match.
//!
//! A [`Resolver`] owns one catalog snapshot and one [`RuleSet`] and never
//! mutates either, so a single instance can be shared across worker threads.

use log::{debug, warn};
use rayon::prelude::*;

use crate::catalog::{LookupIndex, PackageLookup, TargetCatalog};
use crate::config::{MatchResult, MatchSource, Resolution};
use crate::rules::{RuleSet, TransformOutcome};
use crate::scoring::confidence_for;

pub struct Resolver<L: PackageLookup = LookupIndex> {
    index: L,
    rules: RuleSet,
}

impl Resolver<LookupIndex> {
    /// Index `catalog` (minus the rule set's excluded categories) and wrap it.
    pub fn from_catalog(catalog: &TargetCatalog, rules: RuleSet) -> Self {
        let index = LookupIndex::build(catalog, &rules.non_optimizable);
        Self::new(index, rules)
    }
}

impl<L: PackageLookup> Resolver<L> {
    pub fn new(index: L, rules: RuleSet) -> Self {
        Self { index, rules }
    }

    pub fn index(&self) -> &L {
        &self.index
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Resolve one source package name.
    pub fn resolve(&self, name: &str) -> Resolution {
        let (result, source) = if let Some(path) = self.rules.overrides.get(name) {
            (MatchResult::overridden(path), MatchSource::Override)
        } else if let Some(result) = self.match_in(name, None) {
            (result, MatchSource::Direct)
        } else if let Some(result) = self.match_transformed(name) {
            (result, MatchSource::Transformed)
        } else {
            (MatchResult::unmatched(), MatchSource::Unmatched)
        };

        debug!("{name}: {source} -> {:?}", result.best_match);
        Resolution {
            name: name.to_string(),
            result,
            source,
        }
    }

    /// Resolve many names on the current rayon pool, preserving input order.
    pub fn resolve_batch<S: AsRef<str> + Sync>(&self, names: &[S]) -> Vec<Resolution> {
        names.par_iter().map(|n| self.resolve(n.as_ref())).collect()
    }

    fn match_transformed(&self, name: &str) -> Option<MatchResult> {
        match self.rules.transforms.apply(name) {
            TransformOutcome::Applied {
                name: transformed,
                category,
                ..
            } if transformed != name => self.match_in(&transformed, Some(category)),
            _ => None,
        }
    }

    /// Match `name` across its eligible categories, or only `required`.
    fn match_in(&self, name: &str, required: Option<&str>) -> Option<MatchResult> {
        if !self.index.exists(name) {
            return None;
        }
        let eligible = self.index.eligible_categories(name);
        if eligible.is_empty() {
            return None;
        }

        let categories: Vec<&str> = match required {
            Some(req) if eligible.iter().any(|c| c == req) => vec![req],
            Some(_) => return None,
            None => eligible.iter().map(String::as_str).collect(),
        };

        // Confidence counts every eligible category, spelled or not.
        let eligible_count = categories.len();
        let mut candidates: Vec<(&str, String)> = Vec::with_capacity(eligible_count);
        for category in categories {
            match self.index.spelling_in(name, category) {
                Some(spelling) => candidates.push((category, format!("{category}/{spelling}"))),
                None => warn!(
                    "lookup index lists {category} for {name:?} but has no spelling there, skipping"
                ),
            }
        }

        let best = self
            .rules
            .priority
            .select_best(candidates.iter().map(|(c, _)| *c))?;
        let best_match = candidates
            .iter()
            .find(|(c, _)| *c == best)
            .map(|(_, path)| path.clone());
        let all_matches: Vec<String> = candidates.into_iter().map(|(_, path)| path).collect();

        Some(MatchResult {
            confidence: confidence_for(eligible_count),
            all_matches,
            best_match,
        })
    }
}

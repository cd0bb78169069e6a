//! Phase orchestrator with timing: load → index → resolve → aggregate.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use log::info;
use rayon::prelude::*;

use crate::catalog::loader::{load_source_catalog, load_target_catalog};
use crate::catalog::{SourceCatalog, TargetCatalog};
use crate::config::{MapConfig, MappingReport, Resolution};
use crate::error::MapError;
use crate::output::build_report;
use crate::resolver::Resolver;
use crate::rules::RuleSet;

/// Phase labels for progress reporting.
const PHASE_LABELS: &[(&str, &str)] = &[
    ("load", "Reading package catalogs"),
    ("index", "Indexing target catalog"),
    ("resolve", "Resolving package names"),
    ("aggregate", "Building mapping"),
];

/// Progress callback type: (phase_name, label).
pub type ProgressCallback = Box<dyn FnMut(&str, &str)>;

struct PhaseClock {
    callback: Option<ProgressCallback>,
    timings: HashMap<String, f64>,
    current: Option<(&'static str, Instant)>,
}

impl PhaseClock {
    fn new(callback: Option<ProgressCallback>) -> Self {
        Self {
            callback,
            timings: HashMap::new(),
            current: None,
        }
    }

    fn enter(&mut self, name: &'static str) {
        self.finish();
        if let Some(ref mut cb) = self.callback {
            let label = PHASE_LABELS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, l)| *l)
                .unwrap_or(name);
            cb(name, label);
        }
        self.current = Some((name, Instant::now()));
    }

    fn finish(&mut self) {
        if let Some((name, start)) = self.current.take() {
            self.timings
                .insert(name.to_string(), start.elapsed().as_secs_f64());
        }
    }
}

/// Run a full mapping from the paths in `config` and return the report.
///
/// Nothing is written; persisting `report.mapping` is the caller's choice.
pub fn run_pipeline(
    config: &MapConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<MappingReport, MapError> {
    let total_start = Instant::now();
    let mut clock = PhaseClock::new(progress_callback);

    clock.enter("load");
    let rules = match config.rules_path {
        Some(ref path) => RuleSet::load(Path::new(path))?,
        None => RuleSet::default(),
    };
    let source = load_source_catalog(Path::new(&config.source_path))?;
    let target = load_target_catalog(Path::new(&config.target_path))?;
    info!(
        "loaded {} source names, {} target packages in {} categories",
        source.len(),
        target.package_count(),
        target.category_count()
    );

    clock.enter("index");
    let resolver = Resolver::from_catalog(&target, rules);
    info!("indexed {} distinct names", resolver.index().name_count());

    clock.enter("resolve");
    let resolutions = resolve_catalog(&resolver, &source, config.threads)?;

    clock.enter("aggregate");
    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    let mut report = build_report(config, resolutions, &clock.timings, total_ms);
    clock.finish();
    if let Ok(timings) = serde_json::to_value(&clock.timings) {
        report.metadata.insert("phase_timings".to_string(), timings);
    }

    info!(
        "mapped {} of {} names",
        report.summary.matched, report.summary.total
    );
    Ok(report)
}

/// Resolve every name in `source`, in a dedicated pool when `threads` is set.
pub fn resolve_catalog(
    resolver: &Resolver,
    source: &SourceCatalog,
    threads: Option<usize>,
) -> Result<Vec<Resolution>, MapError> {
    let names: Vec<&str> = source.iter().map(String::as_str).collect();
    match threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            Ok(pool.install(|| resolver.resolve_batch(&names)))
        }
        None => Ok(resolver.resolve_batch(&names)),
    }
}

/// Map in-memory catalogs without touching the filesystem.
pub fn map_catalogs(
    source: &SourceCatalog,
    target: &TargetCatalog,
    rules: RuleSet,
) -> Vec<Resolution> {
    let resolver = Resolver::from_catalog(target, rules);
    source
        .par_iter()
        .map(|name| resolver.resolve(name))
        .collect()
}

//! PyO3 bindings for the distromap mapping engine.

use std::path::Path;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use distromap_core::catalog::loader::parse_target_text;
use distromap_core::catalog::{SourceCatalog, TargetCatalog};
use distromap_core::config::{default_output_path, MapConfig, Mapping};
use distromap_core::output::{aggregate, write_mapping};
use distromap_core::pipeline;
use distromap_core::rules::RuleSet;

/// Parse serialised JSON into a Python dict.
fn json_to_py_dict(
    py: Python<'_>,
    json: Result<String, serde_json::Error>,
) -> PyResult<Py<PyDict>> {
    let json_str = json.map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
    let json_module = py.import("json")?;
    json_module
        .call_method1("loads", (json_str,))?
        .extract::<Py<PyDict>>()
}

/// Map in-memory catalogs and return `{name: record}`.
///
/// `target` holds `category/name` strings; malformed entries are skipped
/// with a warning, as when loading a catalog file.
#[pyfunction]
#[pyo3(signature = (source, target, rules_json = None))]
fn map_packages(
    py: Python<'_>,
    source: Vec<String>,
    target: Vec<String>,
    rules_json: Option<&str>,
) -> PyResult<Py<PyDict>> {
    let rules = match rules_json {
        Some(json) => RuleSet::from_json(json).map_err(|e| PyValueError::new_err(e.to_string()))?,
        None => RuleSet::default(),
    };
    let source: SourceCatalog = source
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    let target: TargetCatalog = parse_target_text(&target.join("\n"));

    let resolutions = py.allow_threads(|| pipeline::map_catalogs(&source, &target, rules));
    let (mapping, _summary): (Mapping, _) = aggregate(resolutions);
    json_to_py_dict(py, serde_json::to_string(&mapping))
}

/// Map catalog files, write the mapping JSON, and return the run report
/// without the mapping itself.
#[pyfunction]
#[pyo3(signature = (source_path, target_path, output_path = None, rules_path = None, threads = None, progress = None))]
fn map_files(
    py: Python<'_>,
    source_path: &str,
    target_path: &str,
    output_path: Option<String>,
    rules_path: Option<String>,
    threads: Option<usize>,
    progress: Option<PyObject>,
) -> PyResult<Py<PyDict>> {
    let output_path = output_path.unwrap_or_else(default_output_path);
    let map_config = MapConfig {
        source_path: source_path.to_string(),
        target_path: target_path.to_string(),
        output_path: Some(output_path.clone()),
        rules_path,
        threads,
    };

    // Wrap the Python callable as a Rust ProgressCallback
    let progress_callback = progress.map(|py_cb| -> pipeline::ProgressCallback {
        Box::new(move |phase: &str, label: &str| {
            Python::with_gil(|py| {
                let _ = py_cb.call1(py, (phase, label));
            });
        })
    });

    let mut report = pipeline::run_pipeline(&map_config, progress_callback)
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
    write_mapping(&report.mapping, Path::new(&output_path))
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;

    report.mapping.clear();
    report.metadata.insert(
        "output_path".to_string(),
        serde_json::Value::String(output_path),
    );
    json_to_py_dict(py, serde_json::to_string(&report))
}

/// Return the distromap engine version.
#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// distromap Rust mapping engine.
#[pymodule]
fn _distromap_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(map_packages, m)?)?;
    m.add_function(wrap_pyfunction!(map_files, m)?)?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    Ok(())
}

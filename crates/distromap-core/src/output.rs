//! Folding resolutions into a mapping, and reading/writing the mapping JSON.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;

use crate::config::{MapConfig, Mapping, MappingReport, MappingSummary, Resolution};
use crate::error::MapError;

/// Fold per-name resolutions into a sorted mapping plus summary counts.
///
/// A name seen twice keeps its last resolution.
pub fn aggregate<I>(resolutions: I) -> (Mapping, MappingSummary)
where
    I: IntoIterator<Item = Resolution>,
{
    let mut mapping = Mapping::new();
    let mut summary = MappingSummary::default();
    for resolution in resolutions {
        summary.record(&resolution);
        mapping.insert(resolution.name, resolution.result);
    }
    (mapping, summary)
}

/// Build the MappingReport for a finished run.
pub fn build_report(
    config: &MapConfig,
    resolutions: Vec<Resolution>,
    timings: &HashMap<String, f64>,
    total_ms: f64,
) -> MappingReport {
    let (mapping, summary) = aggregate(resolutions);

    let mut metadata = HashMap::new();
    metadata.insert(
        "source_path".to_string(),
        serde_json::Value::String(config.source_path.clone()),
    );
    metadata.insert(
        "target_path".to_string(),
        serde_json::Value::String(config.target_path.clone()),
    );
    metadata.insert(
        "generated_at".to_string(),
        serde_json::Value::String(Utc::now().to_rfc3339()),
    );
    metadata.insert(
        "distromap_version".to_string(),
        serde_json::Value::String(env!("CARGO_PKG_VERSION").to_string()),
    );
    metadata.insert(
        "duration_ms".to_string(),
        serde_json::json!(((total_ms * 10.0).round() / 10.0)),
    );
    metadata.insert(
        "phase_timings".to_string(),
        serde_json::to_value(timings).unwrap_or_default(),
    );

    MappingReport {
        version: "1.0".to_string(),
        metadata,
        summary,
        mapping,
    }
}

/// Serialise a mapping: sorted keys, two-space indent, trailing newline.
pub fn mapping_to_json(mapping: &Mapping) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(mapping)?;
    json.push('\n');
    Ok(json)
}

/// Write the mapping JSON, creating parent directories as needed.
pub fn write_mapping(mapping: &Mapping, output_path: &Path) -> Result<(), MapError> {
    let write_err = |source| MapError::Write {
        path: output_path.to_path_buf(),
        source,
    };
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let json = mapping_to_json(mapping).map_err(MapError::Serialize)?;
    std::fs::write(output_path, json).map_err(write_err)
}

/// Read a mapping previously written by [`write_mapping`].
pub fn read_mapping(path: &Path) -> Result<Mapping, MapError> {
    let content = std::fs::read_to_string(path).map_err(|source| MapError::Read {
        what: "package mapping",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| MapError::Json {
        what: "package mapping",
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MatchResult, MatchSource};
    use pretty_assertions::assert_eq;

    fn resolution(name: &str, result: MatchResult, source: MatchSource) -> Resolution {
        Resolution {
            name: name.to_string(),
            result,
            source,
        }
    }

    #[test]
    fn aggregate_sorts_and_counts() {
        let (mapping, summary) = aggregate(vec![
            resolution("zlib", MatchResult::overridden("sys-libs/zlib"), MatchSource::Override),
            resolution("abc", MatchResult::unmatched(), MatchSource::Unmatched),
        ]);
        let keys: Vec<&String> = mapping.keys().collect();
        assert_eq!(keys, vec!["abc", "zlib"]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.overrides, 1);
        assert_eq!(summary.unmatched, 1);
    }

    #[test]
    fn json_layout_is_stable() {
        let (mapping, _) = aggregate(vec![
            resolution("b", MatchResult::unmatched(), MatchSource::Unmatched),
            resolution("SDL", MatchResult::overridden("media-libs/libsdl"), MatchSource::Override),
        ]);
        let json = mapping_to_json(&mapping).unwrap();
        let expected = r#"{
  "SDL": {
    "all_matches": [
      "media-libs/libsdl"
    ],
    "confidence": 1.0,
    "gentoo_match": "media-libs/libsdl"
  },
  "b": {
    "all_matches": [],
    "confidence": 0.0,
    "gentoo_match": null
  }
}
"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn report_metadata_keys() {
        let config = MapConfig::default();
        let report = build_report(&config, Vec::new(), &HashMap::new(), 12.34);
        for key in [
            "source_path",
            "target_path",
            "generated_at",
            "distromap_version",
            "duration_ms",
            "phase_timings",
        ] {
            assert!(report.metadata.contains_key(key), "Missing metadata key: {key}");
        }
        assert_eq!(report.metadata["duration_ms"], serde_json::json!(12.3));
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/pkg_mapping.json");
        let (mapping, _) = aggregate(vec![resolution(
            "fmt",
            MatchResult::overridden("dev-libs/libfmt"),
            MatchSource::Override,
        )]);
        write_mapping(&mapping, &path).unwrap();
        assert_eq!(read_mapping(&path).unwrap(), mapping);
    }

    #[test]
    fn read_missing_mapping_names_path() {
        let err = read_mapping(Path::new("/nonexistent/pkg_mapping.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pkg_mapping.json"));
    }
}

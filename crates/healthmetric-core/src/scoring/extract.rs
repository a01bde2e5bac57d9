//! Metric extraction from report documents.
//!
//! Performs a pure structural mapping from the raw `result_data` /
//! `job_metadata` fields onto the metric names declared in the scoring
//! config. No scoring policy lives here; the boundary between extraction and
//! interpretation is strict.

use std::collections::HashMap;

use serde_json::Value;

use crate::scoring::config::BYTES_PER_MB;
use crate::scoring::engine::ScoreError;

/// CAD link types counted by the "CAD Imports" metric.
const CAD_TYPES: [&str; 3] = ["dwg", "dxf", "cad"];

/// Model file size in MB, from the explicit byte count in `job_metadata`.
///
/// The byte count is mandatory: an absent or non-positive value is an error,
/// never an estimate. The whole score depends on this value through size
/// scaling, so fabricating it would silently skew every metric.
pub fn file_size_mb(report: &Value) -> Result<f64, ScoreError> {
    let bytes = report
        .get("job_metadata")
        .and_then(|m| m.get("model_file_size_bytes"))
        .and_then(Value::as_f64)
        .ok_or(ScoreError::MissingFileSize)?;

    if bytes <= 0.0 {
        return Err(ScoreError::NonPositiveFileSize(bytes));
    }

    Ok(bytes / BYTES_PER_MB)
}

/// Observed values for every metric with a data source in current reports.
///
/// Metrics without a source (Unplaced Rooms, Filled Regions, Lines,
/// Unpinned Grids, Unpinned Levels) are reported as 0. The file-size metric
/// is handled separately via [`file_size_mb`].
pub fn extract_metrics(report: &Value) -> HashMap<String, f64> {
    let result_data = report.get("result_data");

    let num = |path: &[&str]| -> f64 {
        let mut cur = result_data;
        for key in path {
            cur = cur.and_then(|v| v.get(key));
        }
        cur.and_then(Value::as_f64).unwrap_or(0.0)
    };

    let critical = num(&["warnings", "critical_warning_count"]);
    let total_warnings = num(&["warnings", "warning_count"]);

    let cad_imports = result_data
        .and_then(|r| r.get("linked_files"))
        .and_then(Value::as_array)
        .map(|files| {
            files
                .iter()
                .filter(|f| {
                    f.get("type")
                        .and_then(Value::as_str)
                        .is_some_and(|t| CAD_TYPES.contains(&t.to_ascii_lowercase().as_str()))
                })
                .count() as f64
        })
        .unwrap_or(0.0);

    let mut metrics = HashMap::new();
    metrics.insert("High Warnings".to_string(), critical);
    metrics.insert(
        "Medium Warnings".to_string(),
        (total_warnings - critical).max(0.0),
    );
    metrics.insert(
        "Purgeable Families".to_string(),
        num(&["purgeable_elements"]),
    );
    metrics.insert(
        "In-Place Families".to_string(),
        num(&["families", "in_place_families"]),
    );
    metrics.insert(
        "Views not on Sheets".to_string(),
        num(&["views_sheets", "views_not_on_sheets"]),
    );
    metrics.insert(
        "Model Groups".to_string(),
        num(&["model_group_usage_analysis", "overused_count"]),
    );
    metrics.insert(
        "Detail Groups".to_string(),
        num(&["detail_group_usage_analysis", "overused_count"]),
    );
    metrics.insert("CAD Imports".to_string(), cad_imports);
    metrics.insert(
        "Unused View Templates".to_string(),
        num(&["templates_filters", "unused_view_templates"]),
    );

    // No data source yet in submitted reports.
    metrics.insert("Unplaced Rooms".to_string(), 0.0);
    metrics.insert("Filled Regions".to_string(), 0.0);
    metrics.insert("Lines".to_string(), 0.0);
    metrics.insert("Unpinned Grids".to_string(), 0.0);
    metrics.insert("Unpinned Levels".to_string(), 0.0);

    metrics
}

//! Health score computation.
//!
//! This module derives a weighted, size-normalized score from an accepted
//! report.
//!
//! Responsibilities:
//! - Scale metric maxima by model size relative to the 500 MB baseline
//! - Apply the linear lower-is-better formula per metric
//! - Map scores to letter grades, overall and per metric
//! - Embed the result back into the report file
//!
//! Non-responsibilities:
//! - Deciding which reports get scored (handled in `report::validate`)
//! - Choosing metric weights (handled in `scoring::config`)
//!
//! Scoring is a pure, deterministic function of the report document and the
//! config: identical inputs always yield an identical [`ScoreResult`]. That
//! property is what makes re-scoring idempotent and the pipeline safely
//! re-runnable.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::report::model::{embed_score, MetricScore, ScoreResult};
use crate::scoring::config::{ScoringConfig, BASE_SIZE_MB, FILE_SIZE_METRIC};
use crate::scoring::extract::{extract_metrics, file_size_mb};

/// Why a single report could not be scored.
///
/// These are per-report failures: the caller records them and moves on to
/// the next report, never aborting the batch.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("job_metadata.model_file_size_bytes is missing; refusing to estimate")]
    MissingFileSize,

    #[error("job_metadata.model_file_size_bytes must be positive, got {0}")]
    NonPositiveFileSize(f64),

    #[error("report has no {0} section")]
    MissingSection(&'static str),

    #[error("failed to read or write report file")]
    Io(#[from] std::io::Error),

    #[error("report is not valid JSON")]
    Json(#[from] serde_json::Error),
}

/// Compute the score for an accepted report document.
pub fn score_report(report: &Value, config: &ScoringConfig) -> Result<ScoreResult, ScoreError> {
    if !report.get("result_data").is_some_and(Value::is_object) {
        return Err(ScoreError::MissingSection("result_data"));
    }

    let size_mb = file_size_mb(report)?;
    let ratio = size_mb / BASE_SIZE_MB;
    let actuals = extract_metrics(report);

    let mut details = Vec::with_capacity(config.metrics().len());
    let mut total = 0.0;

    for def in config.metrics() {
        let is_file_size = def.name == FILE_SIZE_METRIC;

        // The file-size metric measures absolute size against an absolute
        // cap; scaling it by itself would make it vacuous.
        let scaled_max = if is_file_size {
            def.max
        } else {
            def.max * ratio
        };

        let actual = if is_file_size {
            size_mb
        } else {
            actuals.get(&def.name).copied().unwrap_or(0.0)
        };

        let contribution = metric_contribution(actual, def.min, scaled_max, def.weight);
        total += contribution;

        let metric_pct = contribution / f64::from(def.weight) * 100.0;

        details.push(MetricScore {
            metric: def.name.clone(),
            weight: def.weight,
            min: def.min,
            max: def.max,
            scaled_min: def.min,
            scaled_max,
            actual,
            contribution: round2(contribution),
            grade: config.grade_for(metric_pct).to_string(),
        });
    }

    Ok(ScoreResult {
        total_score: round2(total),
        grade: config.grade_for(total).to_string(),
        metrics: details,
    })
}

/// Load a stored report, score it, and write it back with the `score` field
/// attached. No other field is touched.
pub fn score_file(path: &Path, config: &ScoringConfig) -> Result<ScoreResult, ScoreError> {
    let content = std::fs::read(path)?;
    let mut report: Value = serde_json::from_slice(&content)?;

    let score = score_report(&report, config)?;
    embed_score(&mut report, &score)?;

    std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    Ok(score)
}

/// Points earned by one metric.
///
/// Lower actual values always score at least as well as higher ones: the
/// percentage is clamped to [0, 1] and the slope is non-increasing in
/// `actual`.
fn metric_contribution(actual: f64, min: f64, scaled_max: f64, weight: u32) -> f64 {
    let weight = f64::from(weight);

    if scaled_max == min {
        return if actual <= min { weight } else { 0.0 };
    }

    let percentage = ((scaled_max - actual) / (scaled_max - min)).clamp(0.0, 1.0);
    weight * percentage
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Embedded scoring block written back into a report's `score` field.
///
/// This struct is the stable JSON contract consumed by dashboards.
/// It must remain deterministic for identical input reports and config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Overall score, 0..=100, rounded to two decimals.
    pub total_score: f64,
    /// Letter grade for the overall score.
    pub grade: String,
    /// Per-metric breakdown, in scoring-config order.
    pub metrics: Vec<MetricScore>,
}

/// One metric's contribution to the total score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    pub metric: String,
    pub weight: u32,
    /// Configured best-acceptable value.
    pub min: f64,
    /// Configured worst-acceptable value, before size scaling.
    pub max: f64,
    /// Effective bounds after file-size scaling.
    pub scaled_min: f64,
    pub scaled_max: f64,
    /// Observed value extracted from the report.
    pub actual: f64,
    /// Points earned, 0..=weight, rounded to two decimals.
    pub contribution: f64,
    /// Letter grade for this metric alone.
    pub grade: String,
}

/// Attach (or replace) the `score` field on a parsed report document.
///
/// Every other field of the report is left untouched.
pub fn embed_score(report: &mut Value, score: &ScoreResult) -> serde_json::Result<()> {
    let score_value = serde_json::to_value(score)?;
    if let Some(obj) = report.as_object_mut() {
        obj.insert("score".to_string(), score_value);
    }
    Ok(())
}

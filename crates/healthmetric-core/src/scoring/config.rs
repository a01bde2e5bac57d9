//! Scoring configuration.
//!
//! The metric table is an explicit ordered list: breakdown records in the
//! embedded score block follow this order, and that ordering is part of the
//! output contract. Weights are points out of 100; construction fails unless
//! they sum to exactly 100, so a malformed table can never produce a
//! plausible-looking partial score.

use thiserror::Error;

/// Baseline model size in MB; metric maxima scale linearly against it.
pub const BASE_SIZE_MB: f64 = 500.0;

/// Metric name carrying the model file size itself.
/// Its configured max is never size-scaled.
pub const FILE_SIZE_METRIC: &str = "File size";

pub const BYTES_PER_MB: f64 = 1_048_576.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("metric weights must sum to exactly 100, got {0}")]
    WeightSum(u32),

    #[error("metric '{0}' has zero weight")]
    ZeroWeight(String),

    #[error("grade thresholds must not be empty")]
    NoGrades,
}

/// One scoring metric: weight (points), best (`min`) and worst (`max`)
/// acceptable values at the baseline model size.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDef {
    pub name: String,
    pub weight: u32,
    pub min: f64,
    pub max: f64,
}

impl MetricDef {
    fn new(name: &str, weight: u32, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            min,
            max,
        }
    }
}

/// Letter grade with the minimum score that earns it.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeThreshold {
    pub grade: String,
    pub min_score: f64,
}

/// Validated, immutable scoring table. Built once at process start and
/// passed explicitly into the scoring engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    metrics: Vec<MetricDef>,
    grades: Vec<GradeThreshold>,
}

impl ScoringConfig {
    /// Construct a config, enforcing the weight-sum-100 invariant.
    ///
    /// Grade thresholds are sorted highest-first internally so lookup is
    /// independent of the order the caller supplies.
    pub fn new(
        metrics: Vec<MetricDef>,
        mut grades: Vec<GradeThreshold>,
    ) -> Result<Self, ConfigError> {
        if let Some(m) = metrics.iter().find(|m| m.weight == 0) {
            return Err(ConfigError::ZeroWeight(m.name.clone()));
        }

        let sum: u32 = metrics.iter().map(|m| m.weight).sum();
        if sum != 100 {
            return Err(ConfigError::WeightSum(sum));
        }

        if grades.is_empty() {
            return Err(ConfigError::NoGrades);
        }

        grades.sort_by(|a, b| b.min_score.total_cmp(&a.min_score));

        Ok(Self { metrics, grades })
    }

    /// The default production table.
    pub fn default_table() -> Self {
        let metrics = vec![
            MetricDef::new(FILE_SIZE_METRIC, 12, 0.0, 500.0),
            MetricDef::new("High Warnings", 12, 0.0, 30.0),
            MetricDef::new("Purgeable Families", 12, 0.0, 250.0),
            MetricDef::new("Medium Warnings", 8, 0.0, 50.0),
            MetricDef::new("In-Place Families", 8, 0.0, 20.0),
            MetricDef::new("Views not on Sheets", 8, 0.0, 200.0),
            MetricDef::new("Model Groups", 6, 0.0, 100.0),
            MetricDef::new("Detail Groups", 6, 0.0, 100.0),
            MetricDef::new("CAD Imports", 4, 0.0, 5.0),
            MetricDef::new("Unplaced Rooms", 4, 0.0, 10.0),
            MetricDef::new("Unused View Templates", 4, 0.0, 5.0),
            MetricDef::new("Filled Regions", 4, 0.0, 5000.0),
            MetricDef::new("Lines", 4, 0.0, 5000.0),
            MetricDef::new("Unpinned Grids", 4, 0.0, 6.0),
            MetricDef::new("Unpinned Levels", 4, 0.0, 4.0),
        ];

        let grades = [("A", 90.0), ("B", 80.0), ("C", 70.0), ("D", 60.0), ("F", 0.0)]
            .into_iter()
            .map(|(g, t)| GradeThreshold {
                grade: g.to_string(),
                min_score: t,
            })
            .collect();

        Self::new(metrics, grades).expect("default table is valid")
    }

    /// Metrics in contract order.
    pub fn metrics(&self) -> &[MetricDef] {
        &self.metrics
    }

    /// Letter grade for a 0..=100 score: the highest threshold the score
    /// meets, defaulting to the lowest grade.
    pub fn grade_for(&self, score: f64) -> &str {
        self.grades
            .iter()
            .find(|g| score >= g.min_score)
            .unwrap_or_else(|| self.grades.last().expect("grades are non-empty"))
            .grade
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_weights_sum_to_100() {
        let config = ScoringConfig::default_table();
        let sum: u32 = config.metrics().iter().map(|m| m.weight).sum();
        assert_eq!(sum, 100);
        assert_eq!(config.metrics().len(), 15);
    }

    #[test]
    fn default_table_starts_with_file_size() {
        let config = ScoringConfig::default_table();
        assert_eq!(config.metrics()[0].name, FILE_SIZE_METRIC);
        assert_eq!(config.metrics()[0].weight, 12);
    }

    #[test]
    fn rejects_weight_sum_violation() {
        let metrics = vec![MetricDef::new("Only", 99, 0.0, 10.0)];
        let grades = vec![GradeThreshold {
            grade: "F".into(),
            min_score: 0.0,
        }];
        assert_eq!(
            ScoringConfig::new(metrics, grades),
            Err(ConfigError::WeightSum(99))
        );
    }

    #[test]
    fn rejects_zero_weight_metric() {
        let metrics = vec![
            MetricDef::new("Real", 100, 0.0, 10.0),
            MetricDef::new("Ghost", 0, 0.0, 10.0),
        ];
        let grades = vec![GradeThreshold {
            grade: "F".into(),
            min_score: 0.0,
        }];
        assert_eq!(
            ScoringConfig::new(metrics, grades),
            Err(ConfigError::ZeroWeight("Ghost".into()))
        );
    }

    #[test]
    fn rejects_empty_grades() {
        let metrics = vec![MetricDef::new("Only", 100, 0.0, 10.0)];
        assert_eq!(
            ScoringConfig::new(metrics, vec![]),
            Err(ConfigError::NoGrades)
        );
    }

    #[test]
    fn grade_lookup_uses_highest_matching_threshold() {
        let config = ScoringConfig::default_table();
        assert_eq!(config.grade_for(100.0), "A");
        assert_eq!(config.grade_for(90.0), "A");
        assert_eq!(config.grade_for(89.99), "B");
        assert_eq!(config.grade_for(79.2), "C");
        assert_eq!(config.grade_for(60.0), "D");
        assert_eq!(config.grade_for(59.99), "F");
        assert_eq!(config.grade_for(0.0), "F");
    }

    #[test]
    fn grade_lookup_is_order_independent() {
        let metrics = vec![MetricDef::new("Only", 100, 0.0, 10.0)];
        // Supplied lowest-first; lookup must still pick the highest match.
        let grades = vec![
            GradeThreshold {
                grade: "F".into(),
                min_score: 0.0,
            },
            GradeThreshold {
                grade: "A".into(),
                min_score: 90.0,
            },
        ];
        let config = ScoringConfig::new(metrics, grades).unwrap();
        assert_eq!(config.grade_for(95.0), "A");
        assert_eq!(config.grade_for(10.0), "F");
    }
}

pub mod config;
pub mod engine;
pub mod extract;

pub use config::{ConfigError, GradeThreshold, MetricDef, ScoringConfig};
pub use engine::{score_file, score_report, ScoreError};

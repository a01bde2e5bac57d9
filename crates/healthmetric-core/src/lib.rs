pub mod manifest;
pub mod merge;
pub mod naming;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod util;

pub const TOOL_NAME: &str = "healthmetric";

/// JSON schema version of the store manifest.
/// This must be bumped only when the manifest layout changes semantically.
pub const MANIFEST_VERSION: &str = "1.0";

/// Extension of model report files, matched case-insensitively
/// (submitters have historically produced both `.sexyDuck` and `.SexyDuck`).
pub const REPORT_EXTENSION: &str = "sexyduck";

pub use pipeline::{run, RunSummary};

/// Returns true when `path` names a model report file.
pub fn is_report_file(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(REPORT_EXTENSION))
}

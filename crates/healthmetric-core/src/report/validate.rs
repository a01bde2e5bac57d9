//! Report acceptance gate.
//!
//! Decides, from raw bytes alone, whether a submitted report may enter the
//! store. Acceptance is all-or-nothing per file; a rejected report is never
//! placed and never scored.
//!
//! Checks run in a fixed order so that rejection reasons are stable:
//!
//!   1. empty (or whitespace-only) content
//!   2. malformed JSON, including a non-object top level
//!   3. `status` equal to "failed", case-insensitively
//!   4. `result_data.debug_info.error_occurred` truthy
//!   5. `result_data.mock_mode` truthy
//!
//! This function is pure over its input bytes. Logging the outcome is the
//! caller's concern.

use serde_json::Value;
use thiserror::Error;

/// Why a report was refused entry into the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("empty report content")]
    Empty,

    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("report status is 'failed'")]
    FailedStatus,

    #[error("result_data.debug_info.error_occurred is set")]
    ErrorOccurred,

    #[error("result_data.mock_mode is set")]
    MockMode,
}

/// Validate raw report bytes, returning the parsed document on acceptance.
pub fn validate_report(content: &[u8]) -> Result<Value, Rejection> {
    let text = std::str::from_utf8(content)
        .map_err(|e| Rejection::MalformedJson(format!("invalid UTF-8: {e}")))?;

    if text.trim().is_empty() {
        return Err(Rejection::Empty);
    }

    let doc: Value =
        serde_json::from_str(text).map_err(|e| Rejection::MalformedJson(e.to_string()))?;

    if !doc.is_object() {
        return Err(Rejection::MalformedJson(
            "top-level value is not a JSON object".to_string(),
        ));
    }

    if let Some(status) = doc.get("status").and_then(Value::as_str)
        && status.eq_ignore_ascii_case("failed")
    {
        return Err(Rejection::FailedStatus);
    }

    let result_data = doc.get("result_data");

    if result_data
        .and_then(|r| r.get("debug_info"))
        .and_then(|d| d.get("error_occurred"))
        .is_some_and(is_truthy)
    {
        return Err(Rejection::ErrorOccurred);
    }

    if result_data
        .and_then(|r| r.get("mock_mode"))
        .is_some_and(is_truthy)
    {
        return Err(Rejection::MockMode);
    }

    Ok(doc)
}

/// JSON-wide truthiness: `true`, non-zero numbers, and non-empty
/// strings/arrays/objects count as set. Mirrors how submitters flag these
/// fields (booleans in current reports, 0/1 integers in older ones).
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

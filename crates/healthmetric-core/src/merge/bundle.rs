//! Submission bundle discovery and ordering.
//!
//! A bundle is one directory under the inbox root, deposited by the external
//! transport layer. Its name encodes a submission timestamp as adjacent
//! `YYYYMMDD` and `HHMMSS` underscore segments (e.g.
//! `revit_slave_20251002_212526`).
//!
//! Bundles must be consumed strictly oldest-first: placement resolves name
//! collisions by overwrite, so processing order is a correctness requirement,
//! not a performance choice. Bundles whose names carry no parseable timestamp
//! order lexically ahead of dated ones, so a dated resubmission always wins.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

/// One submission bundle awaiting placement.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub name: String,
    pub path: PathBuf,
    /// Timestamp decoded from the bundle name, when present.
    pub timestamp: Option<NaiveDateTime>,
}

/// Enumerate bundle directories under `inbox`, sorted ascending by
/// `(timestamp, name)`.
pub fn discover_bundles(inbox: &Path) -> Result<Vec<Bundle>> {
    let entries = std::fs::read_dir(inbox)
        .with_context(|| format!("failed to read inbox: {}", inbox.display()))?;

    let mut bundles = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list inbox: {}", inbox.display()))?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        bundles.push(Bundle {
            timestamp: parse_bundle_timestamp(&name),
            path: entry.path(),
            name,
        });
    }

    bundles.sort_by(|a, b| (a.timestamp, &a.name).cmp(&(b.timestamp, &b.name)));
    Ok(bundles)
}

/// Decode a timestamp from adjacent date and time segments of a bundle name.
fn parse_bundle_timestamp(name: &str) -> Option<NaiveDateTime> {
    let segments: Vec<&str> = name.split('_').collect();

    segments.windows(2).find_map(|pair| {
        let (date, time) = (pair[0], pair[1]);
        if date.len() != 8 || time.len() != 6 {
            return None;
        }
        if !date.bytes().all(|b| b.is_ascii_digit()) || !time.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S").ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timestamp_from_typical_bundle_name() {
        let ts = parse_bundle_timestamp("revit_slave_20251002_212526").unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-10-02 21:25:26");
    }

    #[test]
    fn unparseable_names_have_no_timestamp() {
        assert!(parse_bundle_timestamp("adhoc_submission").is_none());
        assert!(parse_bundle_timestamp("20251002").is_none());
        assert!(parse_bundle_timestamp("2025100a_212526").is_none());
        assert!(parse_bundle_timestamp("20251301_990000").is_none());
    }

    #[test]
    fn discovery_sorts_oldest_first() {
        let inbox = tempfile::tempdir().unwrap();
        for name in [
            "revit_slave_20251003_080000",
            "revit_slave_20251001_090000",
            "revit_slave_20251002_212526",
        ] {
            std::fs::create_dir(inbox.path().join(name)).unwrap();
        }

        let bundles = discover_bundles(inbox.path()).unwrap();
        let names: Vec<&str> = bundles.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "revit_slave_20251001_090000",
                "revit_slave_20251002_212526",
                "revit_slave_20251003_080000",
            ]
        );
    }

    #[test]
    fn undated_bundles_sort_before_dated_ones_lexically() {
        let inbox = tempfile::tempdir().unwrap();
        for name in ["zzz_manual", "aaa_manual", "job_20250101_000000"] {
            std::fs::create_dir(inbox.path().join(name)).unwrap();
        }

        let bundles = discover_bundles(inbox.path()).unwrap();
        let names: Vec<&str> = bundles.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["aaa_manual", "zzz_manual", "job_20250101_000000"]);
    }

    #[test]
    fn plain_files_in_inbox_are_ignored() {
        let inbox = tempfile::tempdir().unwrap();
        std::fs::write(inbox.path().join("stray.json"), b"{}").unwrap();
        std::fs::create_dir(inbox.path().join("job_20250101_000000")).unwrap();

        let bundles = discover_bundles(inbox.path()).unwrap();
        assert_eq!(bundles.len(), 1);
    }

    #[test]
    fn empty_inbox_yields_no_bundles() {
        let inbox = tempfile::tempdir().unwrap();
        assert!(discover_bundles(inbox.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_inbox_is_an_error() {
        assert!(discover_bundles(Path::new("/nonexistent/healthmetric-inbox")).is_err());
    }
}

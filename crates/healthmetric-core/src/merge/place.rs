//! Merge/placement engine.
//!
//! Walks bundles oldest-first and places every accepted report into the
//! project-keyed destination store. Reports arrive either inside project
//! subfolders (preferred) or as flat legacy files whose project is derived
//! from the filename.
//!
//! Collision rule: same project + same filename overwrites, last writer
//! wins. Combined with oldest-first bundle ordering this guarantees the
//! most recent submission's copy survives.
//!
//! One bad report never aborts the batch: validation rejections and per-file
//! IO failures are counted and logged, and processing continues.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::is_report_file;
use crate::merge::bundle::Bundle;
use crate::naming::ProjectKeyStrategy;
use crate::report::validate::validate_report;

/// Per-bundle placement counts.
#[derive(Debug, Clone, Serialize)]
pub struct BundleOutcome {
    pub bundle: String,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Aggregate placement outcome across all bundles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
    pub bundles: Vec<BundleOutcome>,
    /// Per-file rejection and failure messages, for the run summary.
    pub errors: Vec<String>,
}

/// Place all bundles into the store, in the order given.
///
/// Callers must pass bundles sorted oldest-first (see
/// [`crate::merge::discover_bundles`]); this function preserves the order it
/// is handed.
pub fn place_bundles(
    bundles: &[Bundle],
    store: &Path,
    strategy: &dyn ProjectKeyStrategy,
) -> Result<MergeSummary> {
    std::fs::create_dir_all(store)
        .with_context(|| format!("failed to create store: {}", store.display()))?;

    let mut summary = MergeSummary::default();

    for bundle in bundles {
        let outcome = place_bundle(bundle, store, strategy, &mut summary.errors);
        info!(
            bundle = %bundle.name,
            accepted = outcome.accepted,
            rejected = outcome.rejected,
            failed = outcome.failed,
            "bundle placed"
        );
        summary.accepted += outcome.accepted;
        summary.rejected += outcome.rejected;
        summary.failed += outcome.failed;
        summary.bundles.push(outcome);
    }

    Ok(summary)
}

fn place_bundle(
    bundle: &Bundle,
    store: &Path,
    strategy: &dyn ProjectKeyStrategy,
    errors: &mut Vec<String>,
) -> BundleOutcome {
    let mut outcome = BundleOutcome {
        bundle: bundle.name.clone(),
        accepted: 0,
        rejected: 0,
        failed: 0,
    };

    let entries = match sorted_entries(&bundle.path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(bundle = %bundle.name, error = %e, "failed to enumerate bundle");
            errors.push(format!("{}: {e:#}", bundle.name));
            outcome.failed += 1;
            return outcome;
        }
    };

    for entry in entries {
        if entry.is_dir() {
            // Project subfolder: the folder name is the project key.
            let project = entry
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match sorted_entries(&entry) {
                Ok(files) => {
                    for file in files.into_iter().filter(|f| is_report_file(f)) {
                        place_file(&file, store, &project, &mut outcome, errors);
                    }
                }
                Err(e) => {
                    warn!(project = %project, error = %e, "failed to enumerate project folder");
                    errors.push(format!("{}/{project}: {e:#}", bundle.name));
                    outcome.failed += 1;
                }
            }
        } else if is_report_file(&entry) {
            // Flat legacy file: derive the project from the filename.
            let filename = entry
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let project = strategy.project_key(&filename);
            place_file(&entry, store, &project, &mut outcome, errors);
        }
    }

    outcome
}

/// Validate one report file and copy it into its project directory,
/// overwriting any existing file of the same name.
fn place_file(
    file: &Path,
    store: &Path,
    project: &str,
    outcome: &mut BundleOutcome,
    errors: &mut Vec<String>,
) {
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let content = match std::fs::read(file) {
        Ok(content) => content,
        Err(e) => {
            warn!(file = %file.display(), error = %e, "failed to read report");
            errors.push(format!("{filename}: read failed: {e}"));
            outcome.failed += 1;
            return;
        }
    };

    match validate_report(&content) {
        Ok(_) => {}
        Err(rejection) => {
            debug!(file = %filename, %rejection, "report rejected");
            errors.push(format!("{filename}: rejected: {rejection}"));
            outcome.rejected += 1;
            return;
        }
    }

    let project_dir = store.join(project);
    let dest = project_dir.join(&filename);
    let result = std::fs::create_dir_all(&project_dir)
        .and_then(|_| std::fs::write(&dest, &content));

    match result {
        Ok(()) => outcome.accepted += 1,
        Err(e) => {
            warn!(dest = %dest.display(), error = %e, "failed to place report");
            errors.push(format!("{filename}: copy failed: {e}"));
            outcome.failed += 1;
        }
    }
}

/// Directory entries sorted by name. Within-bundle order carries no
/// dependency, but a stable order keeps logs and error lists reproducible.
fn sorted_entries(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to list {}", dir.display()))?
        .into_iter()
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries)
}

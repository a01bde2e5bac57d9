//! Pipeline orchestration.
//!
//! One run is four strictly ordered, synchronous stages over the store:
//!
//!   1. placement — consume inbox bundles oldest-first
//!   2. manifest checkpoint — index the unscored store
//!   3. scoring — embed a score into every stored report
//!   4. manifest — index the final, scored store
//!
//! The design assumes single-writer access to the store; the external
//! orchestrator serializes runs. File-level errors never escalate: the run
//! completes and reports every outcome in [`RunSummary`]. Only configuration
//! errors and a missing inbox/store root abort a run.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::manifest::{build_manifest, scan_store, write_manifest};
use crate::merge::{discover_bundles, place_bundles, MergeSummary};
use crate::naming::ProjectKeyStrategy;
use crate::scoring::{score_file, ScoringConfig};

/// Aggregate outcome of one pipeline run.
///
/// Every per-file skip and failure is surfaced here even though none of them
/// abort the run; observability is the contract.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub merge: MergeSummary,
    pub scored: usize,
    pub score_failures: usize,
    pub score_errors: Vec<String>,
    pub total_projects: usize,
    pub total_files: usize,
}

/// Run the full aggregation pipeline: place bundles from `inbox` into
/// `store`, score every stored report, and leave a fresh manifest behind.
pub fn run(
    inbox: &Path,
    store: &Path,
    config: &ScoringConfig,
    strategy: &dyn ProjectKeyStrategy,
) -> Result<RunSummary> {
    let bundles = discover_bundles(inbox)?;
    info!(count = bundles.len(), "discovered bundles");

    let merge = place_bundles(&bundles, store, strategy)?;
    info!(
        accepted = merge.accepted,
        rejected = merge.rejected,
        failed = merge.failed,
        "placement complete"
    );

    // Checkpoint manifest: consumers reading mid-run see a document
    // consistent with the placed (unscored) store.
    let checkpoint = build_manifest(store, strategy)?;
    write_manifest(store, &checkpoint)?;

    let mut scored = 0;
    let mut score_errors = Vec::new();
    for report in scan_store(store, strategy)? {
        match score_file(&report.path, config) {
            Ok(result) => {
                scored += 1;
                info!(
                    file = %report.relative_path,
                    score = result.total_score,
                    grade = %result.grade,
                    "report scored"
                );
            }
            Err(e) => {
                warn!(file = %report.relative_path, error = %e, "scoring failed");
                score_errors.push(format!("{}: {e}", report.relative_path));
            }
        }
    }

    let manifest = build_manifest(store, strategy)?;
    write_manifest(store, &manifest)?;
    info!(
        projects = manifest.total_projects,
        files = manifest.total_files,
        scored,
        failures = score_errors.len(),
        "pipeline complete"
    );

    Ok(RunSummary {
        merge,
        scored,
        score_failures: score_errors.len(),
        score_errors,
        total_projects: manifest.total_projects,
        total_files: manifest.total_files,
    })
}

/// Plain-text rendering of a run summary for terminal consumption.
pub fn render_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Placement: {} accepted, {} rejected, {} failed across {} bundle(s)\n",
        summary.merge.accepted,
        summary.merge.rejected,
        summary.merge.failed,
        summary.merge.bundles.len()
    ));
    out.push_str(&format!(
        "Scoring: {} scored, {} failed\n",
        summary.scored, summary.score_failures
    ));
    out.push_str(&format!(
        "Manifest: {} project(s), {} file(s)\n",
        summary.total_projects, summary.total_files
    ));
    for err in summary.merge.errors.iter().chain(&summary.score_errors) {
        out.push_str(&format!("  - {err}\n"));
    }
    out
}

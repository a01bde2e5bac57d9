use serde::{Deserialize, Serialize};

use crate::MANIFEST_VERSION;

/// Top-level store index.
///
/// Always a full replacement of the previous manifest, never a patch, so a
/// written manifest is consistent with store contents at build time by
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub generated_at: String,
    pub total_projects: usize,
    pub total_files: usize,
    pub projects: Vec<ProjectEntry>,
}

impl Manifest {
    pub fn new(generated_at: String, projects: Vec<ProjectEntry>) -> Self {
        let total_files = projects.iter().map(|p| p.total_models).sum();
        Self {
            version: MANIFEST_VERSION.to_string(),
            generated_at,
            total_projects: projects.len(),
            total_files,
            projects,
        }
    }
}

/// One project and its model reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub project_folder: String,
    pub project_name: String,
    pub total_models: usize,
    pub models: Vec<ModelEntry>,
}

/// One stored report, with filename-derived metadata and filesystem facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub filename: String,
    pub relative_path: String,
    pub hub: String,
    pub model: String,
    /// Date token from the filename, not a filesystem time.
    pub timestamp: String,
    pub filesize: u64,
    pub last_modified: String,
}

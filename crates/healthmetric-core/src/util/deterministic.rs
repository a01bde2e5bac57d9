//! Deterministic ordering helpers.
//!
//! These utilities enforce the stable ordering guarantees of the manifest
//! schema. All ordering here is semantic and intentional, ensuring identical
//! store contents always produce an identical manifest.

use crate::manifest::model::{ModelEntry, ProjectEntry};

/// Sort project entries by project folder.
///
/// This ordering is part of the manifest contract and must not change
/// without a manifest version bump.
pub fn sort_projects(projects: &mut [ProjectEntry]) {
    projects.sort_by(|a, b| a.project_folder.cmp(&b.project_folder));
}

/// Sort model entries within a project by filename.
///
/// Ensures stable JSON output regardless of directory enumeration order.
pub fn sort_models(models: &mut [ModelEntry]) {
    models.sort_by(|a, b| a.filename.cmp(&b.filename));
}

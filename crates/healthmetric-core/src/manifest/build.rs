//! Manifest construction.
//!
//! Scans the destination store and produces one full-replacement index of
//! every project and every model report. The builder is read-only over
//! report files and safely re-runnable at any pipeline checkpoint; the
//! pipeline builds it twice, once before scoring and once after, so a
//! consumer observing mid-pipeline still sees a consistent document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::is_report_file;
use crate::manifest::model::{Manifest, ModelEntry, ProjectEntry};
use crate::naming::{extract_metadata, ProjectKeyStrategy};
use crate::util::deterministic::{sort_models, sort_projects};

pub const MANIFEST_FILENAME: &str = "manifest.json";

/// One report discovered in the store.
#[derive(Debug, Clone)]
pub struct StoredReport {
    pub project_key: String,
    pub filename: String,
    /// Path relative to the store root, forward-slash separated.
    pub relative_path: String,
    pub path: PathBuf,
}

/// Enumerate every stored report, grouped key first.
///
/// Project directories contribute under their directory name; legacy flat
/// files at the store root contribute under their filename-derived key.
/// Output is sorted by `(project_key, filename)`.
pub fn scan_store(
    store: &Path,
    strategy: &dyn ProjectKeyStrategy,
) -> Result<Vec<StoredReport>> {
    let entries = std::fs::read_dir(store)
        .with_context(|| format!("failed to read store: {}", store.display()))?;

    let mut reports = Vec::new();

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list store: {}", store.display()))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if entry.file_type()?.is_dir() {
            let dir_entries = std::fs::read_dir(&path)
                .with_context(|| format!("failed to read project dir: {}", path.display()))?;
            for file in dir_entries {
                let file = file?;
                let file_path = file.path();
                if !file.file_type()?.is_file() || !is_report_file(&file_path) {
                    continue;
                }
                let filename = file.file_name().to_string_lossy().into_owned();
                reports.push(StoredReport {
                    project_key: name.clone(),
                    relative_path: format!("{name}/{filename}"),
                    filename,
                    path: file_path,
                });
            }
        } else if is_report_file(&path) {
            reports.push(StoredReport {
                project_key: strategy.project_key(&name),
                relative_path: name.clone(),
                filename: name,
                path,
            });
        }
    }

    reports.sort_by(|a, b| {
        (a.project_key.as_str(), a.filename.as_str())
            .cmp(&(b.project_key.as_str(), b.filename.as_str()))
    });
    Ok(reports)
}

/// Build the manifest for the current store contents.
pub fn build_manifest(store: &Path, strategy: &dyn ProjectKeyStrategy) -> Result<Manifest> {
    let reports = scan_store(store, strategy)?;

    let mut grouped: BTreeMap<String, Vec<ModelEntry>> = BTreeMap::new();
    for report in reports {
        let entry = match model_entry(&report) {
            Ok(entry) => entry,
            Err(e) => {
                // A report vanishing between scan and stat is a per-file
                // event, not a manifest failure.
                warn!(file = %report.path.display(), error = %e, "skipping unreadable report");
                continue;
            }
        };
        grouped.entry(report.project_key).or_default().push(entry);
    }

    let mut projects: Vec<ProjectEntry> = grouped
        .into_iter()
        .map(|(key, mut models)| {
            sort_models(&mut models);
            ProjectEntry {
                project_folder: key.clone(),
                project_name: key,
                total_models: models.len(),
                models,
            }
        })
        .collect();
    sort_projects(&mut projects);

    Ok(Manifest::new(Utc::now().to_rfc3339(), projects))
}

/// Write the manifest document at the store root, replacing any previous one.
pub fn write_manifest(store: &Path, manifest: &Manifest) -> Result<PathBuf> {
    let path = store.join(MANIFEST_FILENAME);
    let json = serde_json::to_string_pretty(manifest).context("failed to encode manifest")?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write manifest: {}", path.display()))?;
    Ok(path)
}

fn model_entry(report: &StoredReport) -> Result<ModelEntry> {
    let metadata = std::fs::metadata(&report.path)
        .with_context(|| format!("failed to stat {}", report.path.display()))?;
    let modified: DateTime<Utc> = metadata
        .modified()
        .with_context(|| format!("no modification time for {}", report.path.display()))?
        .into();

    let name_meta = extract_metadata(&report.filename);

    Ok(ModelEntry {
        filename: report.filename.clone(),
        relative_path: report.relative_path.clone(),
        hub: name_meta.hub,
        model: name_meta.model_name,
        timestamp: name_meta.date,
        filesize: metadata.len(),
        last_modified: modified.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::HubMarkerStrategy;

    fn write_store_file(store: &Path, rel: &str, content: &[u8]) {
        let path = store.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn build(store: &Path) -> Manifest {
        build_manifest(store, &HubMarkerStrategy::default()).unwrap()
    }

    #[test]
    fn indexes_every_project_and_report() {
        let store = tempfile::tempdir().unwrap();
        write_store_file(
            store.path(),
            "2401_Tower/20251002_EA_2401_Tower_ModelA.sexyDuck",
            b"{}",
        );
        write_store_file(
            store.path(),
            "2401_Tower/20251002_EA_2401_Tower_ModelB.sexyDuck",
            b"{}",
        );
        write_store_file(
            store.path(),
            "2402_Bridge/20251002_EA_2402_Bridge_Deck.sexyDuck",
            b"{}",
        );

        let manifest = build(store.path());
        assert_eq!(manifest.total_projects, 2);
        assert_eq!(manifest.total_files, 3);

        let tower = &manifest.projects[0];
        assert_eq!(tower.project_folder, "2401_Tower");
        assert_eq!(tower.total_models, 2);
    }

    #[test]
    fn model_entries_carry_filename_metadata_and_fs_facts() {
        let store = tempfile::tempdir().unwrap();
        write_store_file(
            store.path(),
            "2401_Tower/20251002_EA_2401_Tower_CentralModel.sexyDuck",
            b"0123456789",
        );

        let manifest = build(store.path());
        let model = &manifest.projects[0].models[0];

        assert_eq!(model.filename, "20251002_EA_2401_Tower_CentralModel.sexyDuck");
        assert_eq!(
            model.relative_path,
            "2401_Tower/20251002_EA_2401_Tower_CentralModel.sexyDuck"
        );
        assert_eq!(model.hub, "EA");
        assert_eq!(model.model, "CentralModel");
        assert_eq!(model.timestamp, "20251002");
        assert_eq!(model.filesize, 10);
        assert!(!model.last_modified.is_empty());
    }

    #[test]
    fn legacy_flat_files_group_under_derived_key() {
        let store = tempfile::tempdir().unwrap();
        write_store_file(
            store.path(),
            "20251002_Ennead_Architects_2401_Tower_ModelA.sexyDuck",
            b"{}",
        );
        write_store_file(
            store.path(),
            "20251003_Ennead_Architects_2401_Tower_ModelB.sexyDuck",
            b"{}",
        );

        let manifest = build(store.path());
        assert_eq!(manifest.total_projects, 1);

        let project = &manifest.projects[0];
        assert_eq!(project.project_folder, "2401_Tower");
        assert_eq!(project.total_models, 2);
        // Flat files live at the store root.
        assert_eq!(
            project.models[0].relative_path,
            "20251002_Ennead_Architects_2401_Tower_ModelA.sexyDuck"
        );
    }

    #[test]
    fn flat_and_foldered_reports_merge_under_same_key() {
        let store = tempfile::tempdir().unwrap();
        write_store_file(store.path(), "2401_Tower/a.sexyDuck", b"{}");
        write_store_file(
            store.path(),
            "20251002_Ennead_Architects_2401_Tower_ModelB.sexyDuck",
            b"{}",
        );

        let manifest = build(store.path());
        assert_eq!(manifest.total_projects, 1);
        assert_eq!(manifest.projects[0].total_models, 2);
    }

    #[test]
    fn manifest_file_itself_is_not_indexed() {
        let store = tempfile::tempdir().unwrap();
        write_store_file(store.path(), "2401_Tower/a.sexyDuck", b"{}");

        let manifest = build(store.path());
        write_manifest(store.path(), &manifest).unwrap();

        let rebuilt = build(store.path());
        assert_eq!(rebuilt.total_files, 1);
    }

    #[test]
    fn projects_and_models_are_sorted() {
        let store = tempfile::tempdir().unwrap();
        write_store_file(store.path(), "B_Proj/z.sexyDuck", b"{}");
        write_store_file(store.path(), "B_Proj/a.sexyDuck", b"{}");
        write_store_file(store.path(), "A_Proj/m.sexyDuck", b"{}");

        let manifest = build(store.path());
        let folders: Vec<&str> = manifest
            .projects
            .iter()
            .map(|p| p.project_folder.as_str())
            .collect();
        assert_eq!(folders, vec!["A_Proj", "B_Proj"]);

        let names: Vec<&str> = manifest.projects[1]
            .models
            .iter()
            .map(|m| m.filename.as_str())
            .collect();
        assert_eq!(names, vec!["a.sexyDuck", "z.sexyDuck"]);
    }

    #[test]
    fn empty_store_produces_empty_manifest() {
        let store = tempfile::tempdir().unwrap();
        let manifest = build(store.path());
        assert_eq!(manifest.total_projects, 0);
        assert_eq!(manifest.total_files, 0);
        assert!(manifest.projects.is_empty());
    }

    #[test]
    fn rebuild_is_a_full_replacement() {
        let store = tempfile::tempdir().unwrap();
        write_store_file(store.path(), "2401_Tower/a.sexyDuck", b"{}");

        let first = build(store.path());
        write_manifest(store.path(), &first).unwrap();
        assert_eq!(first.total_files, 1);

        std::fs::remove_file(store.path().join("2401_Tower/a.sexyDuck")).unwrap();
        write_store_file(store.path(), "2402_Bridge/b.sexyDuck", b"{}");

        let second = build(store.path());
        write_manifest(store.path(), &second).unwrap();

        let on_disk: Manifest = serde_json::from_slice(
            &std::fs::read(store.path().join(MANIFEST_FILENAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(on_disk.total_files, 1);
        assert_eq!(on_disk.projects[0].project_folder, "2402_Bridge");
    }

    #[test]
    fn scan_excludes_non_report_files() {
        let store = tempfile::tempdir().unwrap();
        write_store_file(store.path(), "2401_Tower/a.sexyDuck", b"{}");
        write_store_file(store.path(), "2401_Tower/notes.txt", b"x");
        write_store_file(store.path(), "stray.json", b"{}");

        let reports = scan_store(store.path(), &HubMarkerStrategy::default()).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].filename, "a.sexyDuck");
    }

    #[test]
    fn scan_order_is_stable() {
        let store = tempfile::tempdir().unwrap();
        write_store_file(store.path(), "B/b.sexyDuck", b"{}");
        write_store_file(store.path(), "A/z.sexyDuck", b"{}");
        write_store_file(store.path(), "A/a.sexyDuck", b"{}");

        let reports = scan_store(store.path(), &HubMarkerStrategy::default()).unwrap();
        let keys: Vec<(&str, &str)> = reports
            .iter()
            .map(|r| (r.project_key.as_str(), r.filename.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("A", "a.sexyDuck"), ("A", "z.sexyDuck"), ("B", "b.sexyDuck")]
        );
    }
}

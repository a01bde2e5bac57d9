pub mod build;
pub mod model;

pub use build::{build_manifest, scan_store, write_manifest, StoredReport, MANIFEST_FILENAME};
pub use model::{Manifest, ModelEntry, ProjectEntry};

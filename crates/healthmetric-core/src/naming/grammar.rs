//! Filename metadata grammar.
//!
//! Submitters encode report identity in the filename as underscore-separated
//! segments over the stem (extension stripped):
//!
//!   `<date>_<hub>_<project number>_<project name...>_<model name>`
//!
//! The project name may itself span several segments; everything between the
//! project number and the final (model name) segment belongs to it. Filenames
//! with fewer than four segments carry no recoverable metadata and fall back
//! to "Unknown" fields with the whole stem as the model name.

use std::path::Path;

pub const UNKNOWN_FIELD: &str = "Unknown";

/// Metadata recovered from a report filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub date: String,
    pub hub: String,
    pub project_number: String,
    pub project_name: String,
    pub model_name: String,
}

/// Derive report metadata from a filename.
///
/// Pure function of the filename; never touches the filesystem.
pub fn extract_metadata(filename: &str) -> FileMetadata {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let segments: Vec<&str> = stem.split('_').collect();

    if segments.len() < 4 {
        return FileMetadata {
            date: UNKNOWN_FIELD.to_string(),
            hub: UNKNOWN_FIELD.to_string(),
            project_number: UNKNOWN_FIELD.to_string(),
            project_name: UNKNOWN_FIELD.to_string(),
            model_name: stem.to_string(),
        };
    }

    let project_name = if segments.len() == 4 {
        segments[3].to_string()
    } else {
        segments[3..segments.len() - 1].join("_")
    };

    FileMetadata {
        date: segments[0].to_string(),
        hub: segments[1].to_string(),
        project_number: segments[2].to_string(),
        project_name,
        model_name: segments[segments.len() - 1].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_fields_from_long_name() {
        let meta = extract_metadata("20251002_EA_2401_Tower_East_CentralModel.sexyDuck");

        assert_eq!(meta.date, "20251002");
        assert_eq!(meta.hub, "EA");
        assert_eq!(meta.project_number, "2401");
        assert_eq!(meta.project_name, "Tower_East");
        assert_eq!(meta.model_name, "CentralModel");
    }

    #[test]
    fn four_segments_use_last_for_both_project_and_model() {
        let meta = extract_metadata("20251002_EA_2401_Model.sexyDuck");

        assert_eq!(meta.project_name, "Model");
        assert_eq!(meta.model_name, "Model");
    }

    #[test]
    fn short_names_fall_back_to_unknown() {
        let meta = extract_metadata("standalone.sexyDuck");

        assert_eq!(meta.date, UNKNOWN_FIELD);
        assert_eq!(meta.hub, UNKNOWN_FIELD);
        assert_eq!(meta.project_number, UNKNOWN_FIELD);
        assert_eq!(meta.project_name, UNKNOWN_FIELD);
        assert_eq!(meta.model_name, "standalone");
    }

    #[test]
    fn three_segments_still_fall_back() {
        let meta = extract_metadata("20251002_EA_Model.sexyDuck");

        assert_eq!(meta.date, UNKNOWN_FIELD);
        assert_eq!(meta.model_name, "20251002_EA_Model");
    }

    #[test]
    fn extension_is_stripped_case_insensitively() {
        let a = extract_metadata("20251002_EA_2401_Tower_Model.sexyDuck");
        let b = extract_metadata("20251002_EA_2401_Tower_Model.SexyDuck");
        assert_eq!(a, b);
    }

    #[test]
    fn metadata_extraction_is_deterministic() {
        let name = "20251002_EA_2401_Tower_East_Wing_CentralModel.sexyDuck";
        assert_eq!(extract_metadata(name), extract_metadata(name));
    }
}

//! Project-key derivation for legacy flat-file submissions.
//!
//! Bundles that predate project subfolders drop every report into the bundle
//! root; the owning project must be recovered from the filename alone. The
//! heuristic lives behind [`ProjectKeyStrategy`] so placement logic never
//! depends on any particular hub's naming habits, and hub marker tokens are
//! configuration rather than a hardcoded match.

/// Sentinel project key when no project can be derived from a filename.
pub const UNKNOWN_PROJECT: &str = "Unknown_Project";

/// Maps a legacy flat filename to the project key it should be stored under.
pub trait ProjectKeyStrategy {
    fn project_key(&self, filename: &str) -> String;
}

/// Derives the project key from the segments between a known hub marker and
/// the trailing model-name segment.
///
/// Given marker tokens `["Ennead", "Architects"]` and the filename
/// `20251002_Ennead_Architects_2401_Tower_East_Model.sexyDuck`, the key is
/// `2401_Tower_East` (everything after the marker, excluding the final
/// segment). The marker sequence is matched case-insensitively anywhere
/// after the leading date segment.
///
/// Known limitation: hub names whose token count differs from the configured
/// marker are not recognized and fall back to [`UNKNOWN_PROJECT`].
#[derive(Debug, Clone)]
pub struct HubMarkerStrategy {
    marker: Vec<String>,
}

impl HubMarkerStrategy {
    pub fn new<I, S>(marker: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            marker: marker.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for HubMarkerStrategy {
    fn default() -> Self {
        Self::new(["Ennead", "Architects"])
    }
}

impl ProjectKeyStrategy for HubMarkerStrategy {
    fn project_key(&self, filename: &str) -> String {
        let stem = std::path::Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);

        let segments: Vec<&str> = stem.split('_').collect();

        if self.marker.is_empty() || segments.len() < 2 {
            return UNKNOWN_PROJECT.to_string();
        }

        // Scan after the date segment for the marker token sequence.
        let marker_len = self.marker.len();
        let marker_end = (1..segments.len().saturating_sub(marker_len - 1))
            .find(|&i| {
                segments[i..]
                    .iter()
                    .zip(&self.marker)
                    .take(marker_len)
                    .filter(|(seg, tok)| seg.eq_ignore_ascii_case(tok))
                    .count()
                    == marker_len
            })
            .map(|i| i + marker_len);

        let Some(end) = marker_end else {
            return UNKNOWN_PROJECT.to_string();
        };

        // Project key spans from after the marker through the
        // second-to-last segment; the final segment is the model name.
        if end >= segments.len() - 1 {
            return UNKNOWN_PROJECT.to_string();
        }

        segments[end..segments.len() - 1].join("_")
    }
}

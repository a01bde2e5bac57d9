pub mod grammar;
pub mod strategy;

pub use grammar::{extract_metadata, FileMetadata};
pub use strategy::{HubMarkerStrategy, ProjectKeyStrategy, UNKNOWN_PROJECT};

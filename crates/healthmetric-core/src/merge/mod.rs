pub mod bundle;
pub mod place;

pub use bundle::{discover_bundles, Bundle};
pub use place::{place_bundles, BundleOutcome, MergeSummary};

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "healthmetric",
    version,
    about = "Merge, score, and index model health telemetry reports"
)]
pub struct Args {
    /// Inbox directory containing raw submission bundles
    pub inbox: PathBuf,

    /// Destination report store
    pub store: PathBuf,

    /// Output format for the run summary
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Write the run summary to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Hub marker tokens for legacy flat-file project derivation
    #[arg(long = "hub-marker", value_delimiter = ',', default_values_t = [
        String::from("Ennead"),
        String::from("Architects"),
    ])]
    pub hub_marker: Vec<String>,

    /// Enable debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

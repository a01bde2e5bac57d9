use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use healthmetric_core::naming::HubMarkerStrategy;
use healthmetric_core::pipeline;
use healthmetric_core::scoring::ScoringConfig;

mod args;

fn main() -> Result<()> {
    let args = args::Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ScoringConfig::default_table();
    let strategy = HubMarkerStrategy::new(args.hub_marker.clone());

    let summary = pipeline::run(&args.inbox, &args.store, &config, &strategy)?;

    let output = match args.format {
        args::OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
        args::OutputFormat::Text => pipeline::render_text(&summary),
    };

    match args.out {
        Some(path) => std::fs::write(path, &output)?,
        None => print!("{output}"),
    }

    Ok(())
}

//! Process command - extract metadata from a single G-code file.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use super::{load_config, OutputArgs};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input G-code file
    #[arg(required = true)]
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let pipeline = args.output.pipeline(&config)?;

    info!("Processing file: {}", args.input.display());

    let result = pipeline.process(&args.input).await?;

    let options = pipeline.options();
    for target in [&options.json_out, &options.csv_out].into_iter().flatten() {
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            target.display()
        );
    }

    if result.slicer_name.is_none() {
        debug!("No slicer signature found in {}", args.input.display());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

//! Batch processing command for multiple G-code files.

use std::fmt::Display;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use super::{load_config, OutputArgs};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files (e.g. "prints/**/*.gcode")
    #[arg(required = true)]
    input: String,

    #[command(flatten)]
    output: OutputArgs,

    /// Stop at the first file that fails
    #[arg(long)]
    fail_fast: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let pipeline = args.output.pipeline(&config)?;

    let files: Vec<PathBuf> = readable_entries(glob(&args.input)?)
        .into_iter()
        .filter(|p| p.is_file() && config.watch.matches(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // JSON on stdout and a progress bar do not mix
    let pb = if args.output.prints() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut processed = 0usize;
    let mut failed: Vec<(PathBuf, String)> = Vec::new();

    for path in &files {
        match pipeline.process(path).await {
            Ok(_) => processed += 1,
            Err(e) => {
                let message = format!("{:#}", e);
                if args.fail_fast {
                    error!("Failed to process {}: {}", path.display(), message);
                    pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), message);
                }
                warn!("Failed to process {}: {}", path.display(), message);
                failed.push((path.clone(), message));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        files.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(processed).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for (path, message) in &failed {
            eprintln!("  - {}: {}", path.display(), message);
        }
    }

    Ok(())
}

/// Keep the paths a glob walk could read, logging each entry it could not.
fn readable_entries<E: Display>(
    entries: impl IntoIterator<Item = Result<PathBuf, E>>,
) -> Vec<PathBuf> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .collect()
}

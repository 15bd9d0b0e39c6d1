//! Watch command - process new G-code files as they appear in a directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use slicemeta_core::models::WatchConfig;

use super::{load_config, OutputArgs};
use crate::pipeline::Pipeline;

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Directory to watch (not recursive)
    #[arg(required = true)]
    dir: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn run(args: WatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.dir.is_dir() {
        anyhow::bail!("Watch folder does not exist: {}", args.dir.display());
    }
    let dir = args.dir.canonicalize()?;

    let pipeline = args.output.pipeline(&config)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        // Receiver gone means the loop is shutting down
        let _ = tx.send(res);
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    eprintln!("{} Watching: {}", style("ℹ").blue(), dir.display());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Stopping watch on {}", dir.display());
                break;
            }
            event = rx.recv() => match event {
                Some(Ok(event)) => tokio::select! {
                    _ = &mut shutdown => {
                        info!("Stopping watch on {} mid-file", dir.display());
                        break;
                    }
                    _ = handle_event(event, &pipeline, &config.watch) => {}
                },
                Some(Err(e)) => warn!("File watcher error: {}", e),
                None => break,
            },
        }
    }

    Ok(())
}

async fn handle_event(event: Event, pipeline: &Pipeline, config: &WatchConfig) {
    if !matches!(event.kind, EventKind::Create(_)) {
        return;
    }

    for path in event.paths {
        if path.is_dir() || !config.matches(&path) {
            continue;
        }

        let name = display_name(&path);
        info!("G-code file detected: {}", name);

        let interval = Duration::from_millis(config.poll_interval_ms);
        match wait_for_stable_size(&path, config.stabilize_attempts, interval).await {
            Some(size) => debug!("{} settled at {} bytes", name, size),
            None => {
                debug!("{} disappeared before it settled", name);
                continue;
            }
        }

        if let Err(e) = pipeline.process(&path).await {
            warn!("Failed to process {}: {:#}", name, e);
            eprintln!("{} Failed to process {}: {:#}", style("✗").red(), name, e);
        }
    }
}

/// Poll the size of `path` until two consecutive reads agree or the
/// attempts run out. Returns `None` if the file vanishes.
pub async fn wait_for_stable_size(path: &Path, attempts: u32, interval: Duration) -> Option<u64> {
    let mut last = None;

    for attempt in 0..attempts.max(1) {
        let size = tokio::fs::metadata(path).await.ok()?.len();
        if last == Some(size) {
            return Some(size);
        }
        last = Some(size);

        if attempt + 1 < attempts {
            tokio::time::sleep(interval).await;
        }
    }

    last
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

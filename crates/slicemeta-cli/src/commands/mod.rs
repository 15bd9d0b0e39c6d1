pub mod batch;
pub mod config;
pub mod process;
pub mod watch;

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use slicemeta_core::{SliceMetaConfig, SourceMode};

use crate::notion::NotionClient;
use crate::pipeline::{OutputOptions, Pipeline};

/// Output options shared by process, batch and watch.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write the result as pretty JSON to this file (overwritten)
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Append the result as a row to this CSV file
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Notion database ID to create one page per processed file (token from NOTION_TOKEN)
    #[arg(long)]
    notion_db: Option<String>,

    /// Do not print JSON to stdout
    #[arg(long)]
    no_print: bool,

    /// How to store source_file in outputs (default from config: name)
    #[arg(long, value_enum)]
    source_mode: Option<SourceModeArg>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SourceModeArg {
    /// File name only
    Name,
    /// Full path as given (leaks folder structure)
    Full,
}

impl From<SourceModeArg> for SourceMode {
    fn from(arg: SourceModeArg) -> Self {
        match arg {
            SourceModeArg::Name => SourceMode::Name,
            SourceModeArg::Full => SourceMode::Full,
        }
    }
}

impl OutputArgs {
    /// Whether JSON results go to stdout.
    pub fn prints(&self) -> bool {
        !self.no_print
    }

    /// Build the processing pipeline for these options.
    pub fn pipeline(&self, config: &SliceMetaConfig) -> anyhow::Result<Pipeline> {
        let options = OutputOptions {
            json_out: self.json_out.clone(),
            csv_out: self.csv_out.clone(),
            print: self.prints(),
            source_mode: self
                .source_mode
                .map(SourceMode::from)
                .unwrap_or(config.export.source_mode),
        };

        let mut pipeline = Pipeline::new(&config.scan, options);

        if let Some(database_id) = &self.notion_db {
            let client = NotionClient::from_env(database_id, &config.export)?;
            pipeline = pipeline.with_sink(Box::new(client));
        }

        Ok(pipeline)
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slicemeta")
        .join("config.json")
}

/// Load configuration from `path`, the default location, or defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<SliceMetaConfig> {
    if let Some(path) = path {
        return Ok(SliceMetaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(SliceMetaConfig::from_file(&default_path)?)
    } else {
        Ok(SliceMetaConfig::default())
    }
}

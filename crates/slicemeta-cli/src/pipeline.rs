//! Per-file processing: extract, sanitize, write outputs, export.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use slicemeta_core::models::ScanConfig;
use slicemeta_core::{
    build_properties, ExtractionResult, GcodeParser, MetadataParser, RecordSink, SliceMetaError,
    SourceMode,
};

use crate::output;

/// Where results go after extraction.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub json_out: Option<PathBuf>,
    pub csv_out: Option<PathBuf>,
    pub print: bool,
    pub source_mode: SourceMode,
}

/// Extraction plus every configured output for a single file.
pub struct Pipeline {
    parser: GcodeParser,
    options: OutputOptions,
    sink: Option<Box<dyn RecordSink>>,
}

impl Pipeline {
    pub fn new(scan: &ScanConfig, options: OutputOptions) -> Self {
        Self {
            parser: GcodeParser::from_config(scan.clone()),
            options,
            sink: None,
        }
    }

    /// Export every result to a remote record store.
    pub fn with_sink(mut self, sink: Box<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn options(&self) -> &OutputOptions {
        &self.options
    }

    /// Process one file. Outputs are written in order JSON, CSV, remote, stdout.
    pub async fn process(&self, path: &Path) -> anyhow::Result<ExtractionResult> {
        // Scanning is blocking I/O; keep it off the runtime threads
        let parser = self.parser.clone();
        let input = path.to_path_buf();
        let result = tokio::task::spawn_blocking(move || parser.parse_file(&input))
            .await??
            .with_source_mode(self.options.source_mode);

        if let Some(json_out) = &self.options.json_out {
            output::write_json(json_out, &result)?;
            debug!("Wrote JSON to {}", json_out.display());
        }

        if let Some(csv_out) = &self.options.csv_out {
            output::append_csv(csv_out, &result)?;
            debug!("Appended CSV row to {}", csv_out.display());
        }

        if let Some(sink) = &self.sink {
            let title = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| result.source_identifier.clone());
            sink.create_record(&title, build_properties(&result))
                .await
                .map_err(SliceMetaError::from)?;
            info!("Exported {} to remote store", title);
        }

        if self.options.print {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Ok(result)
    }
}

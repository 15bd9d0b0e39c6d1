//! Configuration structures for scanning, watching and exporting.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SliceMetaError};
use crate::export::SourceMode;

/// Main configuration for slicemeta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceMetaConfig {
    /// Line scanner configuration.
    pub scan: ScanConfig,

    /// Directory watch configuration.
    pub watch: WatchConfig,

    /// Output and remote export configuration.
    pub export: ExportConfig,
}

/// Line scanner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of leading lines kept for slicer detection.
    pub header_lines: usize,

    /// Minimum number of lines read before the scan may stop early.
    pub early_exit_after: usize,

    /// Stop reading once every line-level field has been found.
    pub early_exit: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            header_lines: 300,
            early_exit_after: 250,
            early_exit: true,
        }
    }
}

/// Directory watch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// File extensions (without dot, case-insensitive) that trigger processing.
    pub extensions: Vec<String>,

    /// Delay between file size polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum number of size polls before processing anyway.
    pub stabilize_attempts: u32,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["gcode".to_string()],
            poll_interval_ms: 500,
            stabilize_attempts: 12,
        }
    }
}

impl WatchConfig {
    /// Whether `path` carries one of the watched extensions.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|w| w.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

/// Output and remote export configuration.
///
/// Credentials are never part of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// How the source file is written to outputs.
    pub source_mode: SourceMode,

    /// Page creation endpoint of the Notion API.
    pub notion_api_url: String,

    /// Value of the `Notion-Version` header.
    pub notion_version: String,

    /// Timeout for remote calls in seconds.
    pub timeout_secs: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            source_mode: SourceMode::Name,
            notion_api_url: "https://api.notion.com/v1/pages".to_string(),
            notion_version: "2022-06-28".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SliceMetaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| SliceMetaError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SliceMetaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: SliceMetaConfig =
            serde_json::from_str(r#"{"scan": {"header_lines": 100}}"#).unwrap();

        assert_eq!(config.scan.header_lines, 100);
        assert_eq!(config.scan.early_exit_after, 250);
        assert_eq!(config.watch, WatchConfig::default());
        assert_eq!(config.export.source_mode, SourceMode::Name);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SliceMetaConfig::default();
        config.export.source_mode = SourceMode::Full;
        config.save(&path).unwrap();

        assert_eq!(SliceMetaConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            SliceMetaConfig::from_file(&path),
            Err(SliceMetaError::Config(_))
        ));
    }

    #[test]
    fn test_watch_extension_filter() {
        let watch = WatchConfig::default();

        assert!(watch.matches(Path::new("/tmp/benchy.gcode")));
        assert!(watch.matches(Path::new("/tmp/BENCHY.GCODE")));
        assert!(!watch.matches(Path::new("/tmp/benchy.3mf")));
        assert!(!watch.matches(Path::new("/tmp/gcode")));
    }
}

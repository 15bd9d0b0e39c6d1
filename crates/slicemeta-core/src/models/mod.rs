//! Data models.

pub mod config;
pub mod metadata;

pub use config::{ExportConfig, ScanConfig, SliceMetaConfig, WatchConfig};
pub use metadata::{ExtractionResult, Slicer};

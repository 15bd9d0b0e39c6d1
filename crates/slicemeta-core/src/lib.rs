//! Core library for slicer metadata extraction.
//!
//! This crate provides:
//! - A single-pass G-code scanner that reads filament usage, print time
//!   and slicer identity from slicer comments
//! - Data models for extraction results and configuration
//! - Output policy and property mapping for remote record stores

pub mod error;
pub mod export;
pub mod gcode;
pub mod models;

pub use error::{ExportError, Result, SliceMetaError};
pub use export::{build_properties, sanitize_source, RecordSink, SourceMode};
pub use gcode::{extract, GcodeParser, MetadataParser};
pub use models::config::SliceMetaConfig;
pub use models::metadata::{ExtractionResult, Slicer};

//! Print metadata extracted from a G-code file.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::export::{sanitize_source, SourceMode};

/// Metadata extracted from one G-code file.
///
/// Serialized field names match the columns of the CSV export
/// (`source_file`, `slicer`, `filament_mm`, `filament_g`, `time_seconds`).
/// Absent values serialize as `null`. Filament values are written as JSON
/// numbers carrying every digit of the decimal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Total filament length in millimetres.
    #[serde(
        rename = "filament_mm",
        default,
        with = "rust_decimal::serde::arbitrary_precision_option"
    )]
    pub filament_length_mm: Option<Decimal>,

    /// Total filament mass in grams.
    #[serde(
        rename = "filament_g",
        default,
        with = "rust_decimal::serde::arbitrary_precision_option"
    )]
    pub filament_mass_g: Option<Decimal>,

    /// Estimated print duration in seconds.
    #[serde(rename = "time_seconds", default)]
    pub duration_seconds: Option<u64>,

    /// Slicer that produced the file.
    #[serde(rename = "slicer", default)]
    pub slicer_name: Option<Slicer>,

    /// Caller-supplied file reference.
    #[serde(rename = "source_file")]
    pub source_identifier: String,
}

impl ExtractionResult {
    /// Create an empty result for the given source.
    pub fn empty(source_identifier: impl Into<String>) -> Self {
        Self {
            filament_length_mm: None,
            filament_mass_g: None,
            duration_seconds: None,
            slicer_name: None,
            source_identifier: source_identifier.into(),
        }
    }

    /// Return a copy whose source identifier is reduced per `mode`.
    pub fn with_source_mode(mut self, mode: SourceMode) -> Self {
        self.source_identifier = sanitize_source(&self.source_identifier, mode);
        self
    }

    /// Whether every line-level field has been found.
    pub fn is_complete(&self) -> bool {
        self.filament_length_mm.is_some()
            && self.filament_mass_g.is_some()
            && self.duration_seconds.is_some()
    }
}

/// Slicing applications recognized from header signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slicer {
    #[serde(rename = "Bambu Studio")]
    BambuStudio,
    #[serde(rename = "OrcaSlicer")]
    OrcaSlicer,
    #[serde(rename = "PrusaSlicer")]
    PrusaSlicer,
    #[serde(rename = "Cura")]
    Cura,
}

impl Slicer {
    /// Display name, identical to the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Slicer::BambuStudio => "Bambu Studio",
            Slicer::OrcaSlicer => "OrcaSlicer",
            Slicer::PrusaSlicer => "PrusaSlicer",
            Slicer::Cura => "Cura",
        }
    }
}

impl fmt::Display for Slicer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

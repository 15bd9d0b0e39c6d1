//! Filament usage extraction.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::trace;

use super::patterns::{FILAMENT_G, FILAMENT_MM};
use super::FieldExtractor;

/// Unit marker of a "filament used" comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilamentUnit {
    /// `[mm]`, filament length.
    Millimetres,
    /// `[g]`, filament mass.
    Grams,
}

/// Extractor for `filament used [unit] = <number>` comments.
pub struct FilamentExtractor {
    unit: FilamentUnit,
}

impl FilamentExtractor {
    pub fn new(unit: FilamentUnit) -> Self {
        Self { unit }
    }

    /// Extractor for filament length in millimetres.
    pub fn length() -> Self {
        Self::new(FilamentUnit::Millimetres)
    }

    /// Extractor for filament mass in grams.
    pub fn mass() -> Self {
        Self::new(FilamentUnit::Grams)
    }

    fn pattern(&self) -> &'static Regex {
        match self.unit {
            FilamentUnit::Millimetres => &*FILAMENT_MM,
            FilamentUnit::Grams => &*FILAMENT_G,
        }
    }
}

impl FieldExtractor for FilamentExtractor {
    type Output = Decimal;

    fn extract(&self, line: &str) -> Option<Self::Output> {
        let caps = self.pattern().captures(line)?;
        let text = &caps[1];

        // ".75" is valid in slicer output
        let parsed = if text.starts_with('.') {
            Decimal::from_str(&format!("0{text}"))
        } else {
            Decimal::from_str(text)
        };

        match parsed {
            Ok(value) => Some(value),
            Err(e) => {
                trace!("Ignoring unparseable filament value {:?}: {}", text, e);
                None
            }
        }
    }
}

//! Slicer detection from header signatures.

use regex::Regex;

use crate::models::Slicer;

use super::patterns::{BAMBU_STUDIO, CURA, ORCA_SLICER, PRUSA_SLICER};

/// Vendor signatures in priority order.
///
/// Priority is list order, not position in the text: a header naming both
/// PrusaSlicer and Cura is reported as PrusaSlicer.
pub fn signatures() -> [(Slicer, &'static Regex); 4] {
    [
        (Slicer::BambuStudio, &*BAMBU_STUDIO),
        (Slicer::OrcaSlicer, &*ORCA_SLICER),
        (Slicer::PrusaSlicer, &*PRUSA_SLICER),
        (Slicer::Cura, &*CURA),
    ]
}

/// Detect the slicer that produced a header blob.
pub fn detect_slicer(header: &str) -> Option<Slicer> {
    signatures()
        .into_iter()
        .find(|(_, pattern)| pattern.is_match(header))
        .map(|(slicer, _)| slicer)
}

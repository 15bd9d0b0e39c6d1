//! Rule-based field extractors for slicer comments.

pub mod duration;
pub mod filament;
pub mod patterns;
pub mod slicer;

pub use duration::{parse_duration, DurationExtractor, DurationForm, DurationMatch};
pub use filament::{FilamentExtractor, FilamentUnit};
pub use slicer::{detect_slicer, signatures};

/// Trait for per-line field extractors.
///
/// Extractors are pure: a miss, including numeric text that does not
/// parse, is `None` and never an error.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from one trimmed line.
    fn extract(&self, line: &str) -> Option<Self::Output>;
}

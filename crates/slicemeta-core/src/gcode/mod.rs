//! G-code metadata extraction.

mod parser;
pub mod rules;
pub mod scanner;

pub use parser::{extract, GcodeParser, MetadataParser};

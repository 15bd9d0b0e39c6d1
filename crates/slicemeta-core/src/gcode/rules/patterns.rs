//! Common regex patterns for slicer comment extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Filament usage: "; filament used [mm] = 1234.56"
    pub static ref FILAMENT_MM: Regex = Regex::new(
        r"(?i)filament used\s*\[mm\]\s*=\s*([0-9]*\.?[0-9]+)"
    ).unwrap();

    pub static ref FILAMENT_G: Regex = Regex::new(
        r"(?i)filament used\s*\[g\]\s*=\s*([0-9]*\.?[0-9]+)"
    ).unwrap();

    // Native seconds (Cura): ";TIME:7200"
    pub static ref TIME_SECONDS: Regex = Regex::new(
        r"(?i)^;TIME:\s*([0-9]+)\s*$"
    ).unwrap();

    // "; estimated printing time (normal mode) = 17h 56m 3s"
    pub static ref TIME_ESTIMATED: Regex = Regex::new(
        r"(?i)estimated printing time.*?=\s*(.+)$"
    ).unwrap();

    // "; printing time: 1h 23m" / "; print time: 01:23:45"
    pub static ref TIME_GENERIC: Regex = Regex::new(
        r"(?i)(?:printing time|print time)\s*:\s*(.+)$"
    ).unwrap();

    // Duration text after whitespace removal
    pub static ref CLOCK: Regex = Regex::new(
        r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$"
    ).unwrap();

    pub static ref HOURS: Regex = Regex::new(r"(\d+)h").unwrap();
    pub static ref MINUTES: Regex = Regex::new(r"(\d+)m").unwrap();
    pub static ref SECONDS: Regex = Regex::new(r"(\d+)s").unwrap();

    // Slicer signatures
    pub static ref BAMBU_STUDIO: Regex = Regex::new(r"(?i)bambu\s*studio").unwrap();
    pub static ref ORCA_SLICER: Regex = Regex::new(r"(?i)orcaslicer").unwrap();
    pub static ref PRUSA_SLICER: Regex = Regex::new(r"(?i)prusaslicer").unwrap();
    pub static ref CURA: Regex = Regex::new(r"(?i)\bcura(?:_steamengine)?\b").unwrap();
}

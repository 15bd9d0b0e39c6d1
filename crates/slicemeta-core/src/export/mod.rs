//! Output policy and remote export mapping.

mod properties;

pub use properties::{build_properties, RecordSink};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a source file reference appears in outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Final path component only.
    #[default]
    Name,
    /// The reference exactly as supplied.
    Full,
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SourceMode::Name),
            "full" => Ok(SourceMode::Full),
            other => Err(format!("unknown source mode: {other}")),
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::Name => f.write_str("name"),
            SourceMode::Full => f.write_str("full"),
        }
    }
}

/// Reduce a source reference according to `mode`.
///
/// In [`SourceMode::Name`] a reference without a final component (such as
/// `/` or `..`) is returned unchanged.
pub fn sanitize_source(source: &str, mode: SourceMode) -> String {
    match mode {
        SourceMode::Full => source.to_string(),
        SourceMode::Name => Path::new(source)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name_mode() {
        assert_eq!(
            sanitize_source("/home/me/prints/benchy.gcode", SourceMode::Name),
            "benchy.gcode"
        );
        assert_eq!(sanitize_source("benchy.gcode", SourceMode::Name), "benchy.gcode");
        assert_eq!(sanitize_source("/", SourceMode::Name), "/");
    }

    #[test]
    fn test_sanitize_full_mode() {
        assert_eq!(
            sanitize_source("/home/me/prints/benchy.gcode", SourceMode::Full),
            "/home/me/prints/benchy.gcode"
        );
    }

    #[test]
    fn test_source_mode_from_str() {
        assert_eq!("NAME".parse::<SourceMode>(), Ok(SourceMode::Name));
        assert_eq!("full".parse::<SourceMode>(), Ok(SourceMode::Full));
        assert!("relative".parse::<SourceMode>().is_err());
        assert_eq!(SourceMode::default(), SourceMode::Name);
    }
}

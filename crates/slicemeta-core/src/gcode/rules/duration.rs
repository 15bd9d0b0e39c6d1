//! Print duration extraction and normalization.

use std::fmt;

use regex::Regex;

use super::patterns::{CLOCK, HOURS, MINUTES, SECONDS, TIME_ESTIMATED, TIME_GENERIC, TIME_SECONDS};
use super::FieldExtractor;

/// Textual encoding a duration was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationForm {
    /// `;TIME:<seconds>`
    NativeSeconds,
    /// `estimated printing time ... = <text>`
    Estimated,
    /// `printing time: <text>` or `print time: <text>`
    Generic,
}

impl fmt::Display for DurationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationForm::NativeSeconds => f.write_str("native seconds"),
            DurationForm::Estimated => f.write_str("estimated printing time"),
            DurationForm::Generic => f.write_str("printing time"),
        }
    }
}

/// Duration forms in priority order. The first form that yields a value wins.
pub const DURATION_FORMS: [(DurationForm, fn(&str) -> Option<u64>); 3] = [
    (DurationForm::NativeSeconds, native_seconds),
    (DurationForm::Estimated, estimated),
    (DurationForm::Generic, generic),
];

/// A duration found on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationMatch {
    pub form: DurationForm,
    pub seconds: u64,
}

/// Extractor trying every [`DurationForm`] in priority order.
#[derive(Default)]
pub struct DurationExtractor;

impl DurationExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for DurationExtractor {
    type Output = DurationMatch;

    fn extract(&self, line: &str) -> Option<Self::Output> {
        DURATION_FORMS.iter().find_map(|(form, matcher)| {
            matcher(line).map(|seconds| DurationMatch {
                form: *form,
                seconds,
            })
        })
    }
}

fn native_seconds(line: &str) -> Option<u64> {
    TIME_SECONDS.captures(line.trim())?[1].parse().ok()
}

fn estimated(line: &str) -> Option<u64> {
    parse_duration(&TIME_ESTIMATED.captures(line)?[1])
}

fn generic(line: &str) -> Option<u64> {
    parse_duration(&TIME_GENERIC.captures(line)?[1])
}

/// Convert human-readable duration text to seconds.
///
/// Accepts clock forms (`MM:SS`, `H:MM:SS`) and unit-suffixed forms
/// (`17h56m`, `1h 2m 3s`, `45m`). Returns `None` when neither form applies.
pub fn parse_duration(text: &str) -> Option<u64> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    if compact.is_empty() {
        return None;
    }

    if let Some(caps) = CLOCK.captures(&compact) {
        let first: u64 = caps[1].parse().ok()?;
        let second: u64 = caps[2].parse().ok()?;
        return match caps.get(3) {
            Some(third) => total_seconds(first, second, third.as_str().parse().ok()?),
            None => total_seconds(0, first, second),
        };
    }

    let components = [&*HOURS, &*MINUTES, &*SECONDS].map(|p| unit_component(p, &compact));
    if components.iter().all(Option::is_none) {
        return None;
    }

    let mut values = [0u64; 3];
    for (value, component) in values.iter_mut().zip(components) {
        if let Some(parsed) = component {
            *value = parsed?;
        }
    }

    total_seconds(values[0], values[1], values[2])
}

/// `None` when the unit is absent, `Some(None)` when its number overflows.
fn unit_component(pattern: &Regex, text: &str) -> Option<Option<u64>> {
    pattern.captures(text).map(|caps| caps[1].parse().ok())
}

fn total_seconds(hours: u64, minutes: u64, seconds: u64) -> Option<u64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

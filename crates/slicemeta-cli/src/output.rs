//! JSON and CSV writers for extraction results.

use std::fs::{self, OpenOptions};
use std::path::Path;

use slicemeta_core::ExtractionResult;

/// Column order of the CSV export.
pub const CSV_HEADER: [&str; 5] = [
    "source_file",
    "slicer",
    "filament_mm",
    "filament_g",
    "time_seconds",
];

/// Write the result as pretty JSON, replacing any existing file.
pub fn write_json(path: &Path, result: &ExtractionResult) -> anyhow::Result<()> {
    create_parent(path)?;
    fs::write(path, serde_json::to_string_pretty(result)?)?;
    Ok(())
}

/// Append the result as one CSV row. The header row is written only when
/// the file does not exist yet.
pub fn append_csv(path: &Path, result: &ExtractionResult) -> anyhow::Result<()> {
    create_parent(path)?;

    let exists = path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if !exists {
        wtr.write_record(CSV_HEADER)?;
    }
    wtr.write_record(csv_row(result))?;
    wtr.flush()?;

    Ok(())
}

/// One CSV row in [`CSV_HEADER`] order. Absent values are empty cells.
pub fn csv_row(result: &ExtractionResult) -> [String; 5] {
    [
        result.source_identifier.clone(),
        result.slicer_name.map(|s| s.to_string()).unwrap_or_default(),
        result
            .filament_length_mm
            .map(|d| d.to_string())
            .unwrap_or_default(),
        result
            .filament_mass_g
            .map(|d| d.to_string())
            .unwrap_or_default(),
        result
            .duration_seconds
            .map(|s| s.to_string())
            .unwrap_or_default(),
    ]
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

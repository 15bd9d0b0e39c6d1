//! Mapping of extraction results to document-store properties.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{json, Map, Value};

use crate::error::ExportError;
use crate::models::ExtractionResult;

/// A remote store that accepts one record per processed file.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Create one record titled `title` with the given properties.
    async fn create_record(
        &self,
        title: &str,
        properties: Map<String, Value>,
    ) -> Result<(), ExportError>;
}

/// Build the property set for a result. Absent fields are omitted.
pub fn build_properties(result: &ExtractionResult) -> Map<String, Value> {
    let mut props = Map::new();

    if let Some(mass) = result.filament_mass_g.and_then(|d| d.to_f64()) {
        props.insert("Filament g".to_string(), json!({ "number": mass }));
    }

    if let Some(length) = result.filament_length_mm.and_then(|d| d.to_f64()) {
        props.insert("Filament mm".to_string(), json!({ "number": length }));
    }

    if let Some(seconds) = result.duration_seconds {
        props.insert("Time (s)".to_string(), json!({ "number": seconds }));
    }

    if let Some(slicer) = result.slicer_name {
        props.insert(
            "Slicer".to_string(),
            json!({ "select": { "name": slicer.name() } }),
        );
    }

    if !result.source_identifier.is_empty() {
        props.insert(
            "Source File".to_string(),
            json!({ "rich_text": [{ "text": { "content": result.source_identifier } }] }),
        );
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Slicer;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_full_property_set() {
        let result = ExtractionResult {
            filament_length_mm: Some(Decimal::from_str("1234.5").unwrap()),
            filament_mass_g: Some(Decimal::from_str("36.7").unwrap()),
            duration_seconds: Some(7200),
            slicer_name: Some(Slicer::PrusaSlicer),
            source_identifier: "benchy.gcode".to_string(),
        };

        let props = Value::Object(build_properties(&result));

        assert_eq!(
            props,
            json!({
                "Filament g": { "number": 36.7 },
                "Filament mm": { "number": 1234.5 },
                "Time (s)": { "number": 7200 },
                "Slicer": { "select": { "name": "PrusaSlicer" } },
                "Source File": { "rich_text": [{ "text": { "content": "benchy.gcode" } }] },
            })
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let props = build_properties(&ExtractionResult::empty("benchy.gcode"));

        assert_eq!(props.len(), 1);
        assert!(props.contains_key("Source File"));
    }
}

//! Generic report rendering
//!
//! Turns a stored payload back into human-readable sections. Works from the
//! payload alone - section and field names are derived from the stored keys,
//! so reports filed under older schemas stay viewable. The `metadata`
//! provenance block is suppressed.

use serde_json::Value;

/// A rendered section: a title and ordered (label, value) rows
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RenderedSection {
    pub title: String,
    pub fields: Vec<(String, String)>,
}

/// Render a stored report payload into display sections, in storage order
pub fn render(payload: &Value) -> Vec<RenderedSection> {
    let Some(sections) = payload.as_object() else {
        return Vec::new();
    };

    sections
        .iter()
        .filter(|(name, _)| name.as_str() != "metadata")
        .map(|(name, data)| RenderedSection {
            title: title_case(name),
            fields: match data.as_object() {
                Some(fields) => fields
                    .iter()
                    .map(|(key, value)| (title_case(key), format_value(value)))
                    .collect(),
                None => vec![(title_case(name), format_value(data))],
            },
        })
        .collect()
}

/// Turn a snake_case key into a display label
pub fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a stored value for display
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| format!("{}: {}", title_case(key), format_value(value)))
            .collect::<Vec<_>>()
            .join("; "),
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_case() {
        insta::assert_snapshot!(title_case("visual_external_damage"), @"Visual External Damage");
        insta::assert_snapshot!(title_case("ph_level"), @"Ph Level");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(true)), "Yes");
        assert_eq!(format_value(&json!(false)), "No");
        assert_eq!(format_value(&json!("Grease")), "Grease");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!(["a", "b"])), "a, b");
        assert_eq!(format_value(&json!(null)), "");
    }

    #[test]
    fn test_render_skips_metadata() {
        let payload = json!({
            "general": {"maintenance_type": "Preventive"},
            "metadata": {"work_order_id": "WO-1"}
        });
        let sections = render(&payload);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "General");
        assert_eq!(
            sections[0].fields,
            vec![("Maintenance Type".to_string(), "Preventive".to_string())]
        );
    }

    #[test]
    fn test_render_preserves_storage_order() {
        let payload = json!({
            "general": {"maintenance_type": "Preventive"},
            "inspection": {"visual_leaks": true},
            "hvac": {"supply_temp": 55.0},
            "measurements": {},
            "parts": {"additional_materials": ""}
        });
        let titles: Vec<String> = render(&payload).into_iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            ["General", "Inspection", "Hvac", "Measurements", "Parts"]
        );
    }

    #[test]
    fn test_round_trip_from_collected_document() {
        use crate::entities::{Craftsman, Equipment, WorkOrder};
        use crate::report::FormEngine;

        let equipment = Equipment::new("Sump pump".to_string());
        let work_order = WorkOrder::new("Teardown".to_string());
        let craftsman = Craftsman::new("Ada Fowler".to_string(), None);

        let mut engine = FormEngine::new(&work_order, &equipment, &craftsman);
        engine
            .set_field("general", "maintenance_type", "Corrective")
            .unwrap();
        engine
            .set_field("inspection", "visual_unusual_wear", "yes")
            .unwrap();
        engine
            .set_field("mechanical", "bearings_condition", "Poor")
            .unwrap();

        let payload = engine.collect().unwrap().to_json().unwrap();
        let sections = render(&payload);

        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            ["General", "Inspection", "Mechanical", "Measurements", "Parts"]
        );
        assert!(sections[1]
            .fields
            .contains(&("Visual Unusual Wear".to_string(), "Yes".to_string())));
        assert!(sections[2]
            .fields
            .contains(&("Bearings Condition".to_string(), "Poor".to_string())));
    }

    #[test]
    fn test_render_nested_rows() {
        let payload = json!({
            "parts": {
                "items": [
                    {"part_number": "PN-1", "description": "Seal", "quantity": 2, "unit_cost": 1.5}
                ]
            }
        });
        let sections = render(&payload);
        assert_eq!(
            sections[0].fields[0],
            (
                "Items".to_string(),
                "Part Number: PN-1; Description: Seal; Quantity: 2; Unit Cost: 1.5".to_string()
            )
        );
    }
}

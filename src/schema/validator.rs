//! Stored-payload validation against the embedded document schema
//!
//! The viewer never needs this - old payloads stay viewable regardless - but
//! `mrt report validate` uses it to check that stored rows still honor the
//! document contract.

use jsonschema::{validator_for, Validator as JsonValidator};
use rust_embed::Embed;
use serde_json::Value;
use thiserror::Error;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

const DOCUMENT_SCHEMA: &str = "report_document.schema.json";

/// Errors from loading or compiling the embedded schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("embedded schema not found: {0}")]
    Missing(&'static str),

    #[error("embedded schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to compile schema: {0}")]
    Compile(String),
}

/// A single schema violation in a stored payload
#[derive(Debug, Clone, serde::Serialize)]
pub struct Violation {
    /// JSON pointer into the payload ("" for the document root)
    pub path: String,
    pub message: String,
}

/// Validator for stored report payloads
pub struct PayloadValidator {
    validator: JsonValidator,
}

impl PayloadValidator {
    /// Compile the embedded document schema
    pub fn new() -> Result<Self, SchemaError> {
        let file =
            EmbeddedSchemas::get(DOCUMENT_SCHEMA).ok_or(SchemaError::Missing(DOCUMENT_SCHEMA))?;
        let schema: Value = serde_json::from_slice(file.data.as_ref())?;
        let validator = validator_for(&schema).map_err(|e| SchemaError::Compile(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Check a stored payload; an empty result means it conforms
    pub fn validate(&self, payload: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(payload)
            .map(|error| Violation {
                path: error.instance_path.to_string(),
                message: error.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "general": {"maintenance_type": "Preventive"},
            "inspection": {"visual_leaks": false, "additional_findings": ""},
            "mechanical": {"lubrication_performed": true},
            "measurements": {},
            "parts": {"additional_materials": "", "parts_requested": ""},
            "metadata": {
                "work_order_id": "WO-01HQ3K4N5M6P7R8S9T0UVWXY",
                "equipment_id": "EQ-01HQ3K4N5M6P7R8S9T0UVWXY",
                "craftsman_id": "CM-01HQ3K4N5M6P7R8S9T0UVWXY",
                "report_date": "2024-01-01 10:00:00",
                "equipment_type": "mechanical"
            }
        })
    }

    #[test]
    fn test_valid_payload_passes() {
        let validator = PayloadValidator::new().unwrap();
        assert!(validator.validate(&valid_payload()).is_empty());
    }

    #[test]
    fn test_missing_section_fails() {
        let validator = PayloadValidator::new().unwrap();
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("inspection");
        assert!(!validator.validate(&payload).is_empty());
    }

    #[test]
    fn test_two_category_sections_fail() {
        let validator = PayloadValidator::new().unwrap();
        let mut payload = valid_payload();
        payload
            .as_object_mut()
            .unwrap()
            .insert("hvac".to_string(), json!({}));
        assert!(!validator.validate(&payload).is_empty());
    }

    #[test]
    fn test_bad_maintenance_type_fails() {
        let validator = PayloadValidator::new().unwrap();
        let mut payload = valid_payload();
        payload["general"]["maintenance_type"] = json!("Routine");
        let violations = validator.validate(&payload);
        assert!(violations
            .iter()
            .any(|v| v.path.contains("maintenance_type")));
    }
}

//! Equipment registry entries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::identity::{RecordId, RecordPrefix};

/// A piece of registered equipment
///
/// `category` is the explicit classification tag, if one was assigned; an
/// inferred category is never written back here unless explicitly saved.
/// `custom_fields` carries free-form key/value metadata from registration
/// (the `equipment_type` key participates in classification).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    /// Unique identifier
    pub id: RecordId,

    /// Equipment name
    pub name: String,

    /// Manufacturer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Model designation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Serial number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    /// Physical location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Installation date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<NaiveDate>,

    /// Operational status (free-form, e.g. "Active")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Explicit category tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Free-form registration metadata
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_fields: Map<String, Value>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Equipment {
    /// Create a new equipment record with the given name
    pub fn new(name: String) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Eq),
            name,
            manufacturer: None,
            model: None,
            serial_number: None,
            location: None,
            installation_date: None,
            status: None,
            category: None,
            custom_fields: Map::new(),
            created: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_creation() {
        let eq = Equipment::new("Coolant Pump 3".to_string());
        assert!(eq.id.to_string().starts_with("EQ-"));
        assert_eq!(eq.name, "Coolant Pump 3");
        assert!(eq.category.is_none());
    }

    #[test]
    fn test_equipment_roundtrip() {
        let mut eq = Equipment::new("Air Handler".to_string());
        eq.model = Some("AH-2000".to_string());
        eq.custom_fields
            .insert("equipment_type".to_string(), Value::String("hvac".to_string()));

        let yaml = serde_yml::to_string(&eq).unwrap();
        let parsed: Equipment = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(eq.id, parsed.id);
        assert_eq!(eq.model, parsed.model);
        assert_eq!(
            parsed.custom_fields.get("equipment_type").and_then(|v| v.as_str()),
            Some("hvac")
        );
    }
}

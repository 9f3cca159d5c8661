//! Equipment classification
//!
//! Maps an equipment record to the category that decides which
//! category-specific report section applies.

use serde::{Deserialize, Serialize};

use crate::entities::Equipment;

/// Equipment category driving the report schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mechanical,
    Electrical,
    Hvac,
    Plumbing,
}

impl Category {
    /// The section key this category contributes to a report document
    pub fn key(&self) -> &'static str {
        match self {
            Category::Mechanical => "mechanical",
            Category::Electrical => "electrical",
            Category::Hvac => "hvac",
            Category::Plumbing => "plumbing",
        }
    }

    /// All categories, in keyword-scan precedence order
    pub fn all() -> &'static [Category] {
        &[
            Category::Mechanical,
            Category::Electrical,
            Category::Hvac,
            Category::Plumbing,
        ]
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Mechanical => &[
                "pump", "motor", "engine", "compressor", "gear", "valve", "bearing",
            ],
            Category::Electrical => &[
                "electrical",
                "circuit",
                "breaker",
                "transformer",
                "generator",
                "panel",
                "switch",
            ],
            Category::Hvac => &[
                "hvac",
                "air conditioner",
                "heater",
                "furnace",
                "boiler",
                "chiller",
                "ventilation",
            ],
            Category::Plumbing => &[
                "plumbing", "pipe", "drain", "water", "sewage", "toilet", "faucet",
            ],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mechanical" => Ok(Category::Mechanical),
            "electrical" => Ok(Category::Electrical),
            "hvac" => Ok(Category::Hvac),
            "plumbing" => Ok(Category::Plumbing),
            _ => Err(format!(
                "Unknown category: {}. Use mechanical, electrical, hvac, or plumbing",
                s
            )),
        }
    }
}

/// Classify a piece of equipment
///
/// Resolution order, first match wins: explicit category tag, the
/// `equipment_type` custom field, keyword scan over name and model, and
/// finally a mechanical fallback. Never fails; the result is not persisted.
pub fn classify(equipment: &Equipment) -> Category {
    if let Some(category) = equipment
        .category
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<Category>().ok())
    {
        return category;
    }

    if let Some(category) = equipment
        .custom_fields
        .get("equipment_type")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<Category>().ok())
    {
        return category;
    }

    let name = equipment.name.to_lowercase();
    let model = equipment
        .model
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    for category in Category::all() {
        for keyword in category.keywords() {
            if name.contains(keyword) || model.contains(keyword) {
                return *category;
            }
        }
    }

    Category::Mechanical
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_explicit_category_wins() {
        // The name screams "pump" but the explicit tag takes precedence
        let mut eq = Equipment::new("Condensate Pump".to_string());
        eq.category = Some("Electrical".to_string());
        assert_eq!(classify(&eq), Category::Electrical);
    }

    #[test]
    fn test_invalid_explicit_category_falls_through() {
        let mut eq = Equipment::new("Condensate Pump".to_string());
        eq.category = Some("rotating".to_string());
        assert_eq!(classify(&eq), Category::Mechanical);
    }

    #[test]
    fn test_custom_field_equipment_type() {
        let mut eq = Equipment::new("Unit 7".to_string());
        eq.custom_fields
            .insert("equipment_type".to_string(), Value::String("hvac".to_string()));
        assert_eq!(classify(&eq), Category::Hvac);
    }

    #[test]
    fn test_keyword_in_name() {
        let eq = Equipment::new("Main breaker cabinet".to_string());
        assert_eq!(classify(&eq), Category::Electrical);
    }

    #[test]
    fn test_keyword_in_model() {
        let mut eq = Equipment::new("Rooftop unit".to_string());
        eq.model = Some("Chiller CX-40".to_string());
        assert_eq!(classify(&eq), Category::Hvac);
    }

    #[test]
    fn test_keyword_precedence_mechanical_first() {
        // "pump" (mechanical) and "water" (plumbing) both match; the
        // mechanical list is scanned first
        let eq = Equipment::new("Water pump".to_string());
        assert_eq!(classify(&eq), Category::Mechanical);
    }

    #[test]
    fn test_default_is_mechanical() {
        let eq = Equipment::new("Mystery asset".to_string());
        assert_eq!(classify(&eq), Category::Mechanical);
    }
}

//! Choice-field value types
//!
//! Each single-choice field in the report schema has a matching enum here so
//! the in-memory document stays typed; the display label doubles as the
//! serialized form, which is what the stored payload and the generic viewer
//! see.

use serde::{Deserialize, Serialize};

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            /// The display label, as serialized
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(if s.eq_ignore_ascii_case($label) {
                    return Ok($name::$variant);
                })+
                Err(format!(
                    "invalid {} value: '{}'",
                    stringify!($name),
                    s
                ))
            }
        }
    };
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? } default $default:ident) => {
        choice_enum!($(#[$meta])* $name { $($variant => $label),+ });

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }
    };
}

choice_enum! {
    /// Kind of maintenance performed; a report is invalid without one
    MaintenanceType {
        Preventive => "Preventive",
        Corrective => "Corrective",
        Predictive => "Predictive",
        Emergency => "Emergency",
    }
}

choice_enum! {
    /// Equipment condition before or after the work
    EquipmentCondition {
        Operational => "Operational",
        PartiallyOperational => "Partially Operational",
        NonOperational => "Non-Operational",
        Unknown => "Unknown",
        RequiresFurtherAttention => "Requires Further Attention",
    } default Operational
}

choice_enum! {
    /// Inspection rating for a single component
    ComponentCondition {
        NotInspected => "Not Inspected",
        Good => "Good",
        Fair => "Fair",
        Poor => "Poor",
        Replaced => "Replaced",
    } default NotInspected
}

choice_enum! {
    LubricantType {
        NotApplicable => "N/A",
        Oil => "Oil",
        Grease => "Grease",
        Other => "Other",
    } default NotApplicable
}

choice_enum! {
    AlignmentStatus {
        NotApplicable => "N/A",
        WithinSpecification => "Within Specification",
        Adjusted => "Adjusted",
        RequiresFurtherAdjustment => "Requires Further Adjustment",
    } default NotApplicable
}

choice_enum! {
    RefrigerantType {
        NotApplicable => "N/A",
        R22 => "R-22",
        R410A => "R-410A",
        R134A => "R-134a",
        R407C => "R-407C",
        R404A => "R-404A",
        Other => "Other",
    } default NotApplicable
}

choice_enum! {
    LeakTestMethod {
        NotApplicable => "N/A",
        Visual => "Visual",
        PressureTest => "Pressure Test",
        DyeTest => "Dye Test",
        Ultrasonic => "Ultrasonic",
        Other => "Other",
    } default NotApplicable
}

choice_enum! {
    LeakTestResult {
        NotApplicable => "N/A",
        NoLeaksFound => "No Leaks Found",
        LeaksFoundAndRepaired => "Leaks Found and Repaired",
        LeaksFoundRequiresFurtherRepair => "Leaks Found - Requires Further Repair",
    } default NotApplicable
}

choice_enum! {
    NoiseDescription {
        NotApplicable => "N/A",
        Normal => "Normal",
        Whining => "Whining",
        Grinding => "Grinding",
        Knocking => "Knocking",
        Rattling => "Rattling",
        Hissing => "Hissing",
        Other => "Other",
    } default NotApplicable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::schema;
    use std::str::FromStr;

    fn assert_covers<T: FromStr + ToString>(options: &[&str])
    where
        T::Err: std::fmt::Debug,
    {
        for option in options {
            let parsed = T::from_str(option).expect(option);
            assert_eq!(&parsed.to_string(), option);
        }
    }

    #[test]
    fn test_enums_cover_schema_choice_lists() {
        assert_covers::<MaintenanceType>(schema::MAINTENANCE_TYPES);
        assert_covers::<EquipmentCondition>(schema::INITIAL_CONDITIONS);
        assert_covers::<EquipmentCondition>(schema::FINAL_CONDITIONS);
        assert_covers::<ComponentCondition>(schema::CONDITION_RATINGS);
        assert_covers::<LubricantType>(schema::LUBRICANT_TYPES);
        assert_covers::<AlignmentStatus>(schema::ALIGNMENT_STATUSES);
        assert_covers::<RefrigerantType>(schema::REFRIGERANT_TYPES);
        assert_covers::<LeakTestMethod>(schema::LEAK_TEST_METHODS);
        assert_covers::<LeakTestResult>(schema::LEAK_TEST_RESULTS);
        assert_covers::<NoiseDescription>(schema::NOISE_DESCRIPTIONS);
    }

    #[test]
    fn test_serialized_form_is_the_label() {
        let json = serde_json::to_string(&RefrigerantType::R410A).unwrap();
        assert_eq!(json, "\"R-410A\"");
        let parsed: RefrigerantType = serde_json::from_str("\"N/A\"").unwrap();
        assert_eq!(parsed, RefrigerantType::NotApplicable);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            "preventive".parse::<MaintenanceType>().unwrap(),
            MaintenanceType::Preventive
        );
        assert!("routine".parse::<MaintenanceType>().is_err());
    }
}

//! Report schema - the ordered sections and field descriptors for each
//! equipment category
//!
//! Schemas are static data. Every category shares the `general`,
//! `inspection`, `measurements`, and `parts` sections and contributes exactly
//! one category-specific section between `inspection` and `measurements`.
//! The semantic kind on each field drives input parsing; no presentation
//! types leak in here.

use super::category::Category;

/// Semantic field kind with validation constraints
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Bool,
    Text,
    LongText,
    Choice(&'static [&'static str]),
    Integer {
        min: i64,
        max: i64,
        unit: Option<&'static str>,
    },
    Decimal {
        min: f64,
        max: f64,
        unit: Option<&'static str>,
    },
    Date,
    Time,
}

/// A single field descriptor
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Default raw value; fields without one default per kind
    /// (false, empty, first choice, minimum)
    pub default: Option<&'static str>,
}

/// A repeating row group within a section (parts line items, ad hoc readings)
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub max_rows: usize,
    pub columns: &'static [FieldSpec],
}

/// An ordered group of fields in the report form
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub key: &'static str,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
    pub tables: &'static [TableSpec],
}

impl Section {
    /// Look up a scalar field by key
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Look up a row group by key
    pub fn table(&self, key: &str) -> Option<&'static TableSpec> {
        self.tables.iter().find(|t| t.key == key)
    }
}

// Choice lists

pub const MAINTENANCE_TYPES: &[&str] = &["Preventive", "Corrective", "Predictive", "Emergency"];
pub const INITIAL_CONDITIONS: &[&str] = &[
    "Operational",
    "Partially Operational",
    "Non-Operational",
    "Unknown",
];
pub const FINAL_CONDITIONS: &[&str] = &[
    "Operational",
    "Partially Operational",
    "Non-Operational",
    "Requires Further Attention",
];
pub const CONDITION_RATINGS: &[&str] = &["Not Inspected", "Good", "Fair", "Poor", "Replaced"];
pub const LUBRICANT_TYPES: &[&str] = &["N/A", "Oil", "Grease", "Other"];
pub const ALIGNMENT_STATUSES: &[&str] = &[
    "N/A",
    "Within Specification",
    "Adjusted",
    "Requires Further Adjustment",
];
pub const REFRIGERANT_TYPES: &[&str] =
    &["N/A", "R-22", "R-410A", "R-134a", "R-407C", "R-404A", "Other"];
pub const LEAK_TEST_METHODS: &[&str] =
    &["N/A", "Visual", "Pressure Test", "Dye Test", "Ultrasonic", "Other"];
pub const LEAK_TEST_RESULTS: &[&str] = &[
    "N/A",
    "No Leaks Found",
    "Leaks Found and Repaired",
    "Leaks Found - Requires Further Repair",
];
pub const NOISE_DESCRIPTIONS: &[&str] = &[
    "N/A", "Normal", "Whining", "Grinding", "Knocking", "Rattling", "Hissing", "Other",
];

// Field constructors

const fn checkbox(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Bool,
        default: None,
    }
}

const fn text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Text,
        default: None,
    }
}

const fn long_text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::LongText,
        default: None,
    }
}

const fn choice(
    key: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Choice(options),
        default: None,
    }
}

const fn integer(
    key: &'static str,
    label: &'static str,
    min: i64,
    max: i64,
    unit: Option<&'static str>,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Integer { min, max, unit },
        default: None,
    }
}

const fn decimal(
    key: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    unit: Option<&'static str>,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Decimal { min, max, unit },
        default: None,
    }
}

const fn condition(key: &'static str, label: &'static str) -> FieldSpec {
    choice(key, label, CONDITION_RATINGS)
}

// Section tables

pub const GENERAL: Section = Section {
    key: "general",
    title: "General Information",
    fields: &[
        // No default: the craftsman must pick one explicitly
        choice("maintenance_type", "Maintenance Type", MAINTENANCE_TYPES),
        FieldSpec {
            key: "maintenance_date",
            label: "Maintenance Date",
            kind: FieldKind::Date,
            default: None,
        },
        FieldSpec {
            key: "maintenance_time",
            label: "Maintenance Time",
            kind: FieldKind::Time,
            default: None,
        },
        integer("duration_hours", "Duration (Hours)", 0, 24, Some("hours")),
        integer(
            "duration_minutes",
            "Duration (Minutes)",
            0,
            59,
            Some("minutes"),
        ),
        text("personnel", "Personnel ID"),
        FieldSpec {
            default: Some("Operational"),
            ..choice("initial_condition", "Initial Condition", INITIAL_CONDITIONS)
        },
        FieldSpec {
            default: Some("Operational"),
            ..choice("final_condition", "Final Condition", FINAL_CONDITIONS)
        },
    ],
    tables: &[],
};

pub const INSPECTION: Section = Section {
    key: "inspection",
    title: "Inspection Checklist",
    fields: &[
        checkbox("visual_external_damage", "External Damage"),
        checkbox("visual_corrosion", "Corrosion"),
        checkbox("visual_leaks", "Leaks"),
        checkbox("visual_loose_parts", "Loose Parts"),
        checkbox("visual_unusual_wear", "Unusual Wear"),
        checkbox("visual_debris_contamination", "Debris/Contamination"),
        checkbox("visual_alignment_issues", "Alignment Issues"),
        checkbox("operational_unusual_noise", "Unusual Noise"),
        checkbox("operational_vibration", "Vibration"),
        checkbox("operational_overheating", "Overheating"),
        checkbox("operational_slow_operation", "Slow Operation"),
        checkbox("operational_intermittent_operation", "Intermittent Operation"),
        checkbox("operational_control_issues", "Control Issues"),
        checkbox(
            "operational_safety_devices_functioning",
            "Safety Devices Functioning",
        ),
        long_text("additional_findings", "Additional Findings"),
    ],
    tables: &[],
};

pub const MECHANICAL: Section = Section {
    key: "mechanical",
    title: "Mechanical",
    fields: &[
        checkbox("lubrication_performed", "Lubrication Performed"),
        choice("lubricant_type", "Lubricant Type", LUBRICANT_TYPES),
        text("lubricant_brand", "Brand/Specification"),
        text("lubricant_quantity", "Quantity Used"),
        condition("bearings_condition", "Bearings Condition"),
        condition("seals_condition", "Seals Condition"),
        condition("belts_chains_condition", "Belts/Chains Condition"),
        condition("couplings_condition", "Couplings Condition"),
        condition("gears_condition", "Gears Condition"),
        condition("shafts_condition", "Shafts Condition"),
        condition("valves_condition", "Valves Condition"),
        condition("filters_condition", "Filters Condition"),
        checkbox("alignment_checked", "Alignment Checked"),
        choice("alignment_status", "Alignment Status", ALIGNMENT_STATUSES),
        text("alignment_method", "Alignment Method"),
    ],
    tables: &[],
};

pub const ELECTRICAL: Section = Section {
    key: "electrical",
    title: "Electrical",
    fields: &[
        decimal("voltage_l1", "Voltage L1", 0.0, 1000.0, Some("V")),
        decimal("voltage_l2", "Voltage L2", 0.0, 1000.0, Some("V")),
        decimal("voltage_l3", "Voltage L3", 0.0, 1000.0, Some("V")),
        decimal("current_l1", "Current L1", 0.0, 1000.0, Some("A")),
        decimal("current_l2", "Current L2", 0.0, 1000.0, Some("A")),
        decimal("current_l3", "Current L3", 0.0, 1000.0, Some("A")),
        decimal("power_factor", "Power Factor", 0.0, 1.0, None),
        FieldSpec {
            default: Some("60"),
            ..decimal("frequency", "Frequency", 0.0, 100.0, Some("Hz"))
        },
        checkbox("insulation_tested", "Insulation Test Performed"),
        decimal(
            "insulation_resistance",
            "Insulation Resistance",
            0.0,
            10000.0,
            Some("MΩ"),
        ),
        integer("test_voltage", "Test Voltage", 0, 5000, Some("V")),
        condition("contactors_condition", "Contactors Condition"),
        condition("relays_condition", "Relays Condition"),
        condition("circuit_breakers_condition", "Circuit Breakers Condition"),
        condition("fuses_condition", "Fuses Condition"),
        condition("terminals_condition", "Terminals Condition"),
        condition("wiring_condition", "Wiring Condition"),
        condition("controls_condition", "Controls Condition"),
        condition("grounding_condition", "Grounding Condition"),
    ],
    tables: &[],
};

pub const HVAC: Section = Section {
    key: "hvac",
    title: "HVAC",
    fields: &[
        decimal("supply_temp", "Supply Air Temperature", -50.0, 150.0, Some("°F")),
        decimal("return_temp", "Return Air Temperature", -50.0, 150.0, Some("°F")),
        decimal("ambient_temp", "Ambient Temperature", -50.0, 150.0, Some("°F")),
        decimal(
            "temp_differential",
            "Temperature Differential",
            0.0,
            100.0,
            Some("°F"),
        ),
        decimal("suction_pressure", "Suction Pressure", 0.0, 500.0, Some("PSI")),
        decimal(
            "discharge_pressure",
            "Discharge Pressure",
            0.0,
            500.0,
            Some("PSI"),
        ),
        decimal("static_pressure", "Static Pressure", 0.0, 10.0, Some("inWC")),
        choice("refrigerant_type", "Refrigerant Type", REFRIGERANT_TYPES),
        decimal("refrigerant_added", "Refrigerant Added", 0.0, 100.0, Some("lbs")),
        decimal(
            "refrigerant_recovered",
            "Refrigerant Recovered",
            0.0,
            100.0,
            Some("lbs"),
        ),
        decimal("superheat", "Superheat", 0.0, 100.0, Some("°F")),
        decimal("subcooling", "Subcooling", 0.0, 100.0, Some("°F")),
        condition("filters_condition", "Filters Condition"),
        condition("coils_condition", "Coils Condition"),
        condition("condensate_drain_condition", "Condensate Drain Condition"),
        condition("blower_fan_condition", "Blower/Fan Condition"),
        condition("compressor_condition", "Compressor Condition"),
        condition(
            "electrical_connections_condition",
            "Electrical Connections Condition",
        ),
        condition("ductwork_condition", "Ductwork Condition"),
        condition("thermostat_condition", "Thermostat Condition"),
    ],
    tables: &[],
};

pub const PLUMBING: Section = Section {
    key: "plumbing",
    title: "Plumbing",
    fields: &[
        decimal("water_pressure", "Water Pressure", 0.0, 200.0, Some("PSI")),
        decimal("flow_rate", "Flow Rate", 0.0, 100.0, Some("GPM")),
        checkbox("leak_test_performed", "Leak Test Performed"),
        choice("leak_test_method", "Test Method", LEAK_TEST_METHODS),
        choice("leak_test_result", "Test Result", LEAK_TEST_RESULTS),
        checkbox("water_quality_tested", "Water Quality Tested"),
        decimal("ph_level", "pH Level", 0.0, 14.0, None),
        integer("tds_level", "TDS Level", 0, 2000, Some("ppm")),
        condition("pipes_condition", "Pipes Condition"),
        condition("fittings_condition", "Fittings Condition"),
        condition("valves_condition", "Valves Condition"),
        condition("fixtures_condition", "Fixtures Condition"),
        condition("drains_condition", "Drains Condition"),
        condition("traps_condition", "Traps Condition"),
        condition("water_heater_condition", "Water Heater Condition"),
        condition("pumps_condition", "Pumps Condition"),
    ],
    tables: &[],
};

pub const MEASUREMENTS: Section = Section {
    key: "measurements",
    title: "Measurements",
    fields: &[
        checkbox("vibration_measured", "Vibration Measured"),
        decimal("vibration_level", "Vibration Level", 0.0, 100.0, Some("mm/s")),
        text("vibration_location", "Measurement Location"),
        checkbox("temp_measured", "Temperature Measured"),
        checkbox("noise_measured", "Noise Measured"),
        integer("noise_level", "Noise Level", 0, 150, Some("dB")),
        choice("noise_description", "Noise Description", NOISE_DESCRIPTIONS),
    ],
    tables: &[
        TableSpec {
            key: "temperature_readings",
            title: "Temperature Readings",
            max_rows: 3,
            columns: &[
                text("location", "Location"),
                decimal("temperature", "Temperature", 0.0, 1000.0, Some("°F")),
            ],
        },
        TableSpec {
            key: "custom_measurements",
            title: "Other Measurements",
            max_rows: 3,
            columns: &[
                text("name", "Measurement Name"),
                text("value", "Value"),
                text("unit", "Unit"),
            ],
        },
    ],
};

pub const PARTS: Section = Section {
    key: "parts",
    title: "Parts & Materials",
    fields: &[
        long_text("additional_materials", "Additional Materials"),
        long_text("parts_requested", "Parts Requested"),
    ],
    tables: &[TableSpec {
        key: "items",
        title: "Parts and Materials Used",
        max_rows: 5,
        columns: &[
            text("part_number", "Part Number"),
            text("description", "Description"),
            integer("quantity", "Quantity", 0, 1000, None),
            decimal("unit_cost", "Unit Cost", 0.0, 10000.0, Some("$")),
        ],
    }],
};

/// The ordered sections of a report for the given category
pub fn schema_for(category: Category) -> Vec<&'static Section> {
    let specific = match category {
        Category::Mechanical => &MECHANICAL,
        Category::Electrical => &ELECTRICAL,
        Category::Hvac => &HVAC,
        Category::Plumbing => &PLUMBING,
    };
    vec![&GENERAL, &INSPECTION, specific, &MEASUREMENTS, &PARTS]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_shared_and_specific_sections() {
        for category in Category::all() {
            let sections = schema_for(*category);
            let keys: Vec<&str> = sections.iter().map(|s| s.key).collect();

            assert_eq!(keys[0], "general");
            assert_eq!(keys[1], "inspection");
            assert_eq!(keys[2], category.key());
            assert_eq!(keys[3], "measurements");
            assert_eq!(keys[4], "parts");

            // Exactly one category-specific section
            let specific: Vec<&&str> = keys
                .iter()
                .filter(|k| Category::all().iter().any(|c| c.key() == **k))
                .collect();
            assert_eq!(specific.len(), 1);
        }
    }

    #[test]
    fn test_inspection_checklist_shape() {
        let bools = INSPECTION
            .fields
            .iter()
            .filter(|f| f.kind == FieldKind::Bool)
            .count();
        assert_eq!(bools, 14);
        assert_eq!(
            INSPECTION
                .fields
                .iter()
                .filter(|f| f.key.starts_with("visual_"))
                .count(),
            7
        );
        assert_eq!(
            INSPECTION
                .fields
                .iter()
                .filter(|f| f.key.starts_with("operational_"))
                .count(),
            7
        );
        assert!(INSPECTION.field("additional_findings").is_some());
    }

    #[test]
    fn test_parts_table_limits() {
        let table = PARTS.table("items").unwrap();
        assert_eq!(table.max_rows, 5);
        assert_eq!(table.columns.len(), 4);
    }

    #[test]
    fn test_field_lookup() {
        let field = GENERAL.field("maintenance_type").unwrap();
        assert!(matches!(field.kind, FieldKind::Choice(_)));
        assert!(field.default.is_none());
        assert!(GENERAL.field("nope").is_none());
    }

    #[test]
    fn test_condition_groups_have_eight_entries() {
        for section in [&MECHANICAL, &ELECTRICAL, &HVAC, &PLUMBING] {
            let conditions = section
                .fields
                .iter()
                .filter(|f| f.key.ends_with("_condition"))
                .count();
            assert_eq!(conditions, 8, "section {}", section.key);
        }
    }
}

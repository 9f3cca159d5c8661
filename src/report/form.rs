//! Report form engine
//!
//! Builds a report document from raw shell input. The engine owns a typed
//! draft seeded with schema defaults; the shell (interactive prompt loop or
//! `--set` flags) feeds it raw strings, and the schema's semantic field kind
//! drives a single typed parse - no presentation types are ever consulted.
//! `collect()` assembles the final document, including the metadata block.

use chrono::{Local, NaiveDate, NaiveTime};
use thiserror::Error;

use crate::core::identity::RecordId;
use crate::entities::{Craftsman, Equipment, WorkOrder};

use super::category::{classify, Category};
use super::document::{
    CategorySection, CustomMeasurement, Document, ElectricalSection, GeneralSection,
    HvacSection, InspectionSection, MeasurementsSection, MechanicalSection, Metadata, PartLine,
    PartsSection, PlumbingSection, TemperatureReading, REPORT_DATE_FORMAT,
};
use super::schema::{schema_for, FieldKind, FieldSpec, Section};

/// A parsed field value, produced by [`parse_value`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    Choice(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Time(NaiveTime),
}

/// Per-field input errors; reported to the shell, never fatal to the form
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("unknown field: {section}.{key}")]
    UnknownField { section: String, key: String },

    #[error("unknown row group: {section}.{key}")]
    UnknownTable { section: String, key: String },

    #[error("'{input}' is not a valid yes/no value")]
    InvalidBool { input: String },

    #[error("'{input}' is not one of: {}", options.join(", "))]
    InvalidChoice { input: String, options: Vec<String> },

    #[error("'{input}' is not a valid number")]
    InvalidNumber { input: String },

    #[error("{value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        value: String,
        min: String,
        max: String,
    },

    #[error("'{input}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("'{input}' is not a valid time (expected HH:MM)")]
    InvalidTime { input: String },

    #[error("row group {section}.{key} holds at most {max} rows")]
    TooManyRows {
        section: String,
        key: String,
        max: usize,
    },

    #[error("row for {section}.{key} needs {expected} values, got {got}")]
    RowShape {
        section: String,
        key: String,
        expected: usize,
        got: usize,
    },

    #[error("{message}")]
    Invalid { message: String },
}

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks submission
    Error,
    /// Submission may proceed after explicit confirmation
    Warning,
}

/// A validation finding, scoped to a section (and field, when one applies)
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub section: &'static str,
    pub field: Option<&'static str>,
    pub message: String,
    pub severity: Severity,
}

/// Errors from assembling the final document
#[derive(Debug, Error)]
pub enum FormError {
    #[error("validation failed: {}", first_error(issues))]
    Invalid { issues: Vec<ValidationIssue> },
}

fn first_error(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .find(|i| i.severity == Severity::Error)
        .map(|i| format!("[{}] {}", i.section, i.message))
        .unwrap_or_else(|| "unknown validation failure".to_string())
}

/// Parse raw shell input according to the field's semantic kind
pub fn parse_value(spec: &FieldSpec, raw: &str) -> Result<FieldValue, FieldError> {
    let raw = raw.trim();
    match spec.kind {
        FieldKind::Bool => match raw.to_lowercase().as_str() {
            "y" | "yes" | "true" | "1" | "checked" => Ok(FieldValue::Bool(true)),
            "" | "n" | "no" | "false" | "0" => Ok(FieldValue::Bool(false)),
            _ => Err(FieldError::InvalidBool {
                input: raw.to_string(),
            }),
        },
        FieldKind::Text | FieldKind::LongText => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Choice(options) => options
            .iter()
            .find(|o| o.eq_ignore_ascii_case(raw))
            .map(|o| FieldValue::Choice(o.to_string()))
            .ok_or_else(|| FieldError::InvalidChoice {
                input: raw.to_string(),
                options: options.iter().map(|o| o.to_string()).collect(),
            }),
        FieldKind::Integer { min, max, .. } => {
            let value: i64 = raw.parse().map_err(|_| FieldError::InvalidNumber {
                input: raw.to_string(),
            })?;
            if value < min || value > max {
                return Err(FieldError::OutOfRange {
                    value: value.to_string(),
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
            Ok(FieldValue::Int(value))
        }
        FieldKind::Decimal { min, max, .. } => {
            let value: f64 = raw.parse().map_err(|_| FieldError::InvalidNumber {
                input: raw.to_string(),
            })?;
            if value < min || value > max {
                return Err(FieldError::OutOfRange {
                    value: value.to_string(),
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
            Ok(FieldValue::Float(value))
        }
        FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(FieldValue::Date)
            .map_err(|_| FieldError::InvalidDate {
                input: raw.to_string(),
            }),
        FieldKind::Time => NaiveTime::parse_from_str(raw, "%H:%M")
            .map(FieldValue::Time)
            .map_err(|_| FieldError::InvalidTime {
                input: raw.to_string(),
            }),
    }
}

fn parse_enum<T>(s: &str) -> Result<T, FieldError>
where
    T: std::str::FromStr<Err = String>,
{
    s.parse().map_err(|message| FieldError::Invalid { message })
}

fn unsupported(key: &str) -> FieldError {
    FieldError::Invalid {
        message: format!("unsupported field: {}", key),
    }
}

impl GeneralSection {
    fn apply(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match (key, value) {
            ("maintenance_type", FieldValue::Choice(s)) => {
                self.maintenance_type = Some(parse_enum(&s)?)
            }
            ("maintenance_date", FieldValue::Date(d)) => self.maintenance_date = d,
            ("maintenance_time", FieldValue::Time(t)) => self.maintenance_time = t,
            ("duration_hours", FieldValue::Int(i)) => self.duration_hours = i as u8,
            ("duration_minutes", FieldValue::Int(i)) => self.duration_minutes = i as u8,
            ("personnel", FieldValue::Text(s)) => self.personnel = s,
            ("initial_condition", FieldValue::Choice(s)) => {
                self.initial_condition = parse_enum(&s)?
            }
            ("final_condition", FieldValue::Choice(s)) => self.final_condition = parse_enum(&s)?,
            (key, _) => return Err(unsupported(key)),
        }
        Ok(())
    }
}

impl InspectionSection {
    fn checkbox_slot(&mut self, key: &str) -> Option<&mut bool> {
        match key {
            "visual_external_damage" => Some(&mut self.visual_external_damage),
            "visual_corrosion" => Some(&mut self.visual_corrosion),
            "visual_leaks" => Some(&mut self.visual_leaks),
            "visual_loose_parts" => Some(&mut self.visual_loose_parts),
            "visual_unusual_wear" => Some(&mut self.visual_unusual_wear),
            "visual_debris_contamination" => Some(&mut self.visual_debris_contamination),
            "visual_alignment_issues" => Some(&mut self.visual_alignment_issues),
            "operational_unusual_noise" => Some(&mut self.operational_unusual_noise),
            "operational_vibration" => Some(&mut self.operational_vibration),
            "operational_overheating" => Some(&mut self.operational_overheating),
            "operational_slow_operation" => Some(&mut self.operational_slow_operation),
            "operational_intermittent_operation" => {
                Some(&mut self.operational_intermittent_operation)
            }
            "operational_control_issues" => Some(&mut self.operational_control_issues),
            "operational_safety_devices_functioning" => {
                Some(&mut self.operational_safety_devices_functioning)
            }
            _ => None,
        }
    }

    fn apply(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match (key, value) {
            ("additional_findings", FieldValue::Text(s)) => self.additional_findings = s,
            (key, FieldValue::Bool(b)) => match self.checkbox_slot(key) {
                Some(slot) => *slot = b,
                None => return Err(unsupported(key)),
            },
            (key, _) => return Err(unsupported(key)),
        }
        Ok(())
    }
}

impl MechanicalSection {
    fn condition_slot(&mut self, key: &str) -> Option<&mut super::fields::ComponentCondition> {
        match key {
            "bearings_condition" => Some(&mut self.bearings_condition),
            "seals_condition" => Some(&mut self.seals_condition),
            "belts_chains_condition" => Some(&mut self.belts_chains_condition),
            "couplings_condition" => Some(&mut self.couplings_condition),
            "gears_condition" => Some(&mut self.gears_condition),
            "shafts_condition" => Some(&mut self.shafts_condition),
            "valves_condition" => Some(&mut self.valves_condition),
            "filters_condition" => Some(&mut self.filters_condition),
            _ => None,
        }
    }

    fn apply(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match (key, value) {
            ("lubrication_performed", FieldValue::Bool(b)) => self.lubrication_performed = b,
            ("lubricant_type", FieldValue::Choice(s)) => self.lubricant_type = parse_enum(&s)?,
            ("lubricant_brand", FieldValue::Text(s)) => self.lubricant_brand = s,
            ("lubricant_quantity", FieldValue::Text(s)) => self.lubricant_quantity = s,
            ("alignment_checked", FieldValue::Bool(b)) => self.alignment_checked = b,
            ("alignment_status", FieldValue::Choice(s)) => self.alignment_status = parse_enum(&s)?,
            ("alignment_method", FieldValue::Text(s)) => self.alignment_method = s,
            (key, FieldValue::Choice(s)) => match self.condition_slot(key) {
                Some(slot) => *slot = parse_enum(&s)?,
                None => return Err(unsupported(key)),
            },
            (key, _) => return Err(unsupported(key)),
        }
        Ok(())
    }
}

impl ElectricalSection {
    fn decimal_slot(&mut self, key: &str) -> Option<&mut f64> {
        match key {
            "voltage_l1" => Some(&mut self.voltage_l1),
            "voltage_l2" => Some(&mut self.voltage_l2),
            "voltage_l3" => Some(&mut self.voltage_l3),
            "current_l1" => Some(&mut self.current_l1),
            "current_l2" => Some(&mut self.current_l2),
            "current_l3" => Some(&mut self.current_l3),
            "power_factor" => Some(&mut self.power_factor),
            "frequency" => Some(&mut self.frequency),
            "insulation_resistance" => Some(&mut self.insulation_resistance),
            _ => None,
        }
    }

    fn condition_slot(&mut self, key: &str) -> Option<&mut super::fields::ComponentCondition> {
        match key {
            "contactors_condition" => Some(&mut self.contactors_condition),
            "relays_condition" => Some(&mut self.relays_condition),
            "circuit_breakers_condition" => Some(&mut self.circuit_breakers_condition),
            "fuses_condition" => Some(&mut self.fuses_condition),
            "terminals_condition" => Some(&mut self.terminals_condition),
            "wiring_condition" => Some(&mut self.wiring_condition),
            "controls_condition" => Some(&mut self.controls_condition),
            "grounding_condition" => Some(&mut self.grounding_condition),
            _ => None,
        }
    }

    fn apply(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match (key, value) {
            ("insulation_tested", FieldValue::Bool(b)) => self.insulation_tested = b,
            ("test_voltage", FieldValue::Int(i)) => self.test_voltage = i,
            (key, FieldValue::Float(v)) => match self.decimal_slot(key) {
                Some(slot) => *slot = v,
                None => return Err(unsupported(key)),
            },
            (key, FieldValue::Choice(s)) => match self.condition_slot(key) {
                Some(slot) => *slot = parse_enum(&s)?,
                None => return Err(unsupported(key)),
            },
            (key, _) => return Err(unsupported(key)),
        }
        Ok(())
    }
}

impl HvacSection {
    fn decimal_slot(&mut self, key: &str) -> Option<&mut f64> {
        match key {
            "supply_temp" => Some(&mut self.supply_temp),
            "return_temp" => Some(&mut self.return_temp),
            "ambient_temp" => Some(&mut self.ambient_temp),
            "temp_differential" => Some(&mut self.temp_differential),
            "suction_pressure" => Some(&mut self.suction_pressure),
            "discharge_pressure" => Some(&mut self.discharge_pressure),
            "static_pressure" => Some(&mut self.static_pressure),
            "refrigerant_added" => Some(&mut self.refrigerant_added),
            "refrigerant_recovered" => Some(&mut self.refrigerant_recovered),
            "superheat" => Some(&mut self.superheat),
            "subcooling" => Some(&mut self.subcooling),
            _ => None,
        }
    }

    fn condition_slot(&mut self, key: &str) -> Option<&mut super::fields::ComponentCondition> {
        match key {
            "filters_condition" => Some(&mut self.filters_condition),
            "coils_condition" => Some(&mut self.coils_condition),
            "condensate_drain_condition" => Some(&mut self.condensate_drain_condition),
            "blower_fan_condition" => Some(&mut self.blower_fan_condition),
            "compressor_condition" => Some(&mut self.compressor_condition),
            "electrical_connections_condition" => {
                Some(&mut self.electrical_connections_condition)
            }
            "ductwork_condition" => Some(&mut self.ductwork_condition),
            "thermostat_condition" => Some(&mut self.thermostat_condition),
            _ => None,
        }
    }

    fn apply(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match (key, value) {
            ("refrigerant_type", FieldValue::Choice(s)) => self.refrigerant_type = parse_enum(&s)?,
            (key, FieldValue::Float(v)) => match self.decimal_slot(key) {
                Some(slot) => *slot = v,
                None => return Err(unsupported(key)),
            },
            (key, FieldValue::Choice(s)) => match self.condition_slot(key) {
                Some(slot) => *slot = parse_enum(&s)?,
                None => return Err(unsupported(key)),
            },
            (key, _) => return Err(unsupported(key)),
        }
        Ok(())
    }
}

impl PlumbingSection {
    fn condition_slot(&mut self, key: &str) -> Option<&mut super::fields::ComponentCondition> {
        match key {
            "pipes_condition" => Some(&mut self.pipes_condition),
            "fittings_condition" => Some(&mut self.fittings_condition),
            "valves_condition" => Some(&mut self.valves_condition),
            "fixtures_condition" => Some(&mut self.fixtures_condition),
            "drains_condition" => Some(&mut self.drains_condition),
            "traps_condition" => Some(&mut self.traps_condition),
            "water_heater_condition" => Some(&mut self.water_heater_condition),
            "pumps_condition" => Some(&mut self.pumps_condition),
            _ => None,
        }
    }

    fn apply(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match (key, value) {
            ("water_pressure", FieldValue::Float(v)) => self.water_pressure = v,
            ("flow_rate", FieldValue::Float(v)) => self.flow_rate = v,
            ("leak_test_performed", FieldValue::Bool(b)) => self.leak_test_performed = b,
            ("leak_test_method", FieldValue::Choice(s)) => self.leak_test_method = parse_enum(&s)?,
            ("leak_test_result", FieldValue::Choice(s)) => self.leak_test_result = parse_enum(&s)?,
            ("water_quality_tested", FieldValue::Bool(b)) => self.water_quality_tested = b,
            ("ph_level", FieldValue::Float(v)) => self.ph_level = v,
            ("tds_level", FieldValue::Int(i)) => self.tds_level = i,
            (key, FieldValue::Choice(s)) => match self.condition_slot(key) {
                Some(slot) => *slot = parse_enum(&s)?,
                None => return Err(unsupported(key)),
            },
            (key, _) => return Err(unsupported(key)),
        }
        Ok(())
    }
}

impl MeasurementsSection {
    fn apply(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match (key, value) {
            ("vibration_measured", FieldValue::Bool(b)) => self.vibration_measured = b,
            ("vibration_level", FieldValue::Float(v)) => self.vibration_level = v,
            ("vibration_location", FieldValue::Text(s)) => self.vibration_location = s,
            ("temp_measured", FieldValue::Bool(b)) => self.temp_measured = b,
            ("noise_measured", FieldValue::Bool(b)) => self.noise_measured = b,
            ("noise_level", FieldValue::Int(i)) => self.noise_level = i,
            ("noise_description", FieldValue::Choice(s)) => {
                self.noise_description = parse_enum(&s)?
            }
            (key, _) => return Err(unsupported(key)),
        }
        Ok(())
    }
}

impl PartsSection {
    fn apply(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match (key, value) {
            ("additional_materials", FieldValue::Text(s)) => self.additional_materials = s,
            ("parts_requested", FieldValue::Text(s)) => self.parts_requested = s,
            (key, _) => return Err(unsupported(key)),
        }
        Ok(())
    }
}

impl CategorySection {
    fn apply(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match self {
            CategorySection::Mechanical(s) => s.apply(key, value),
            CategorySection::Electrical(s) => s.apply(key, value),
            CategorySection::Hvac(s) => s.apply(key, value),
            CategorySection::Plumbing(s) => s.apply(key, value),
        }
    }
}

/// The form engine: a typed draft bound to one work order
pub struct FormEngine {
    category: Category,
    general: GeneralSection,
    inspection: InspectionSection,
    category_section: CategorySection,
    measurements: MeasurementsSection,
    parts: PartsSection,
    work_order_id: RecordId,
    equipment_id: RecordId,
    craftsman_id: RecordId,
}

impl FormEngine {
    /// Start a draft for the given work order, equipment, and craftsman
    ///
    /// Classifies the equipment, seeds every section with schema defaults,
    /// and pre-fills the personnel field with the craftsman's ID.
    pub fn new(work_order: &WorkOrder, equipment: &Equipment, craftsman: &Craftsman) -> Self {
        let category = classify(equipment);
        let mut general = GeneralSection::default();
        general.personnel = craftsman.id.to_string();

        Self {
            category,
            general,
            inspection: InspectionSection::default(),
            category_section: CategorySection::default_for(category),
            measurements: MeasurementsSection::default(),
            parts: PartsSection::default(),
            work_order_id: work_order.id.clone(),
            equipment_id: equipment.id.clone(),
            craftsman_id: craftsman.id.clone(),
        }
    }

    /// The classified category driving the schema
    pub fn category(&self) -> Category {
        self.category
    }

    /// The resolved schema sections, in form order
    pub fn sections(&self) -> Vec<&'static Section> {
        schema_for(self.category)
    }

    fn section_spec(&self, key: &str) -> Result<&'static Section, FieldError> {
        self.sections()
            .into_iter()
            .find(|s| s.key == key)
            .ok_or_else(|| FieldError::UnknownSection(key.to_string()))
    }

    /// Set a scalar field from raw input
    pub fn set_field(&mut self, section: &str, key: &str, raw: &str) -> Result<(), FieldError> {
        let spec = self.section_spec(section)?;
        let field = spec.field(key).ok_or_else(|| FieldError::UnknownField {
            section: section.to_string(),
            key: key.to_string(),
        })?;
        let value = parse_value(field, raw)?;

        match spec.key {
            "general" => self.general.apply(key, value),
            "inspection" => self.inspection.apply(key, value),
            "measurements" => self.measurements.apply(key, value),
            "parts" => self.parts.apply(key, value),
            _ => self.category_section.apply(key, value),
        }
    }

    /// Append a row to a repeating group (parts items, ad hoc readings)
    pub fn push_row(&mut self, section: &str, table: &str, values: &[String]) -> Result<(), FieldError> {
        let spec = self.section_spec(section)?;
        let table_spec = spec.table(table).ok_or_else(|| FieldError::UnknownTable {
            section: section.to_string(),
            key: table.to_string(),
        })?;

        if values.len() != table_spec.columns.len() {
            return Err(FieldError::RowShape {
                section: section.to_string(),
                key: table.to_string(),
                expected: table_spec.columns.len(),
                got: values.len(),
            });
        }

        let current_rows = match (section, table) {
            ("measurements", "temperature_readings") => self.measurements.temperature_readings.len(),
            ("measurements", "custom_measurements") => self.measurements.custom_measurements.len(),
            ("parts", "items") => self.parts.items.len(),
            _ => 0,
        };
        if current_rows >= table_spec.max_rows {
            return Err(FieldError::TooManyRows {
                section: section.to_string(),
                key: table.to_string(),
                max: table_spec.max_rows,
            });
        }

        let mut parsed = Vec::with_capacity(values.len());
        for (column, raw) in table_spec.columns.iter().zip(values) {
            parsed.push(parse_value(column, raw)?);
        }

        match (section, table) {
            ("measurements", "temperature_readings") => {
                if let [FieldValue::Text(location), FieldValue::Float(temperature)] =
                    parsed.as_slice()
                {
                    self.measurements.temperature_readings.push(TemperatureReading {
                        location: location.clone(),
                        temperature: *temperature,
                    });
                }
            }
            ("measurements", "custom_measurements") => {
                if let [FieldValue::Text(name), FieldValue::Text(value), FieldValue::Text(unit)] =
                    parsed.as_slice()
                {
                    self.measurements.custom_measurements.push(CustomMeasurement {
                        name: name.clone(),
                        value: value.clone(),
                        unit: unit.clone(),
                    });
                }
            }
            ("parts", "items") => {
                if let [FieldValue::Text(part_number), FieldValue::Text(description), FieldValue::Int(quantity), FieldValue::Float(unit_cost)] =
                    parsed.as_slice()
                {
                    self.parts.items.push(PartLine {
                        part_number: part_number.clone(),
                        description: description.clone(),
                        quantity: *quantity,
                        unit_cost: *unit_cost,
                    });
                }
            }
            _ => unreachable!("table spec resolved above"),
        }
        Ok(())
    }

    /// Validate the draft
    ///
    /// A missing maintenance type blocks submission; an untouched inspection
    /// checklist only warns, and the shell decides whether to proceed.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.general.maintenance_type.is_none() {
            issues.push(ValidationIssue {
                section: "general",
                field: Some("maintenance_type"),
                message: "Please select a maintenance type".to_string(),
                severity: Severity::Error,
            });
        }

        if !self.inspection.any_checked() {
            issues.push(ValidationIssue {
                section: "inspection",
                field: None,
                message: "No inspection items are checked".to_string(),
                severity: Severity::Warning,
            });
        }

        issues
    }

    /// Whether the draft passes blocking validation
    pub fn is_valid(&self) -> bool {
        !self
            .validate()
            .iter()
            .any(|i| i.severity == Severity::Error)
    }

    /// Assemble the final document, stamping the metadata block
    pub fn collect(&self) -> Result<Document, FormError> {
        let issues = self.validate();
        if issues.iter().any(|i| i.severity == Severity::Error) {
            return Err(FormError::Invalid { issues });
        }

        Ok(Document {
            general: self.general.clone(),
            inspection: self.inspection.clone(),
            category: self.category_section.clone(),
            measurements: self.measurements.clone(),
            parts: self.parts.clone(),
            metadata: Metadata {
                work_order_id: self.work_order_id.to_string(),
                equipment_id: self.equipment_id.to_string(),
                craftsman_id: self.craftsman_id.to_string(),
                report_date: Local::now().format(REPORT_DATE_FORMAT).to_string(),
                equipment_type: self.category,
            },
        })
    }
}

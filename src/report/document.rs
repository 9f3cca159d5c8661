//! The report document - typed in memory, a nested section/field/value map
//! once serialized
//!
//! Internally every section is a concrete struct and the category-specific
//! section is a tagged union over the four categories. At the serialization
//! boundary the document flattens to the stored contract: a map from section
//! key to a map of field values, with the category section keyed by its
//! category name and a trailing `metadata` provenance block.

use chrono::{Local, NaiveDate, NaiveTime};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::fields::{
    AlignmentStatus, ComponentCondition, EquipmentCondition, LeakTestMethod, LeakTestResult,
    LubricantType, MaintenanceType, NoiseDescription, RefrigerantType,
};

/// Timestamp format used in the `metadata` block
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// General information section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_type: Option<MaintenanceType>,
    pub maintenance_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub maintenance_time: NaiveTime,
    pub duration_hours: u8,
    pub duration_minutes: u8,
    pub personnel: String,
    pub initial_condition: EquipmentCondition,
    pub final_condition: EquipmentCondition,
}

impl Default for GeneralSection {
    fn default() -> Self {
        let now = Local::now();
        Self {
            maintenance_type: None,
            maintenance_date: now.date_naive(),
            maintenance_time: now.time(),
            duration_hours: 0,
            duration_minutes: 0,
            personnel: String::new(),
            initial_condition: EquipmentCondition::default(),
            final_condition: EquipmentCondition::default(),
        }
    }
}

/// Inspection checklist section: seven visual and seven operational items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionSection {
    pub visual_external_damage: bool,
    pub visual_corrosion: bool,
    pub visual_leaks: bool,
    pub visual_loose_parts: bool,
    pub visual_unusual_wear: bool,
    pub visual_debris_contamination: bool,
    pub visual_alignment_issues: bool,
    pub operational_unusual_noise: bool,
    pub operational_vibration: bool,
    pub operational_overheating: bool,
    pub operational_slow_operation: bool,
    pub operational_intermittent_operation: bool,
    pub operational_control_issues: bool,
    pub operational_safety_devices_functioning: bool,
    pub additional_findings: String,
}

impl InspectionSection {
    /// Whether any checklist item is checked
    pub fn any_checked(&self) -> bool {
        self.visual_external_damage
            || self.visual_corrosion
            || self.visual_leaks
            || self.visual_loose_parts
            || self.visual_unusual_wear
            || self.visual_debris_contamination
            || self.visual_alignment_issues
            || self.operational_unusual_noise
            || self.operational_vibration
            || self.operational_overheating
            || self.operational_slow_operation
            || self.operational_intermittent_operation
            || self.operational_control_issues
            || self.operational_safety_devices_functioning
    }
}

/// Mechanical category section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanicalSection {
    pub lubrication_performed: bool,
    pub lubricant_type: LubricantType,
    pub lubricant_brand: String,
    pub lubricant_quantity: String,
    pub bearings_condition: ComponentCondition,
    pub seals_condition: ComponentCondition,
    pub belts_chains_condition: ComponentCondition,
    pub couplings_condition: ComponentCondition,
    pub gears_condition: ComponentCondition,
    pub shafts_condition: ComponentCondition,
    pub valves_condition: ComponentCondition,
    pub filters_condition: ComponentCondition,
    pub alignment_checked: bool,
    pub alignment_status: AlignmentStatus,
    pub alignment_method: String,
}

/// Electrical category section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectricalSection {
    pub voltage_l1: f64,
    pub voltage_l2: f64,
    pub voltage_l3: f64,
    pub current_l1: f64,
    pub current_l2: f64,
    pub current_l3: f64,
    pub power_factor: f64,
    pub frequency: f64,
    pub insulation_tested: bool,
    pub insulation_resistance: f64,
    pub test_voltage: i64,
    pub contactors_condition: ComponentCondition,
    pub relays_condition: ComponentCondition,
    pub circuit_breakers_condition: ComponentCondition,
    pub fuses_condition: ComponentCondition,
    pub terminals_condition: ComponentCondition,
    pub wiring_condition: ComponentCondition,
    pub controls_condition: ComponentCondition,
    pub grounding_condition: ComponentCondition,
}

impl Default for ElectricalSection {
    fn default() -> Self {
        Self {
            voltage_l1: 0.0,
            voltage_l2: 0.0,
            voltage_l3: 0.0,
            current_l1: 0.0,
            current_l2: 0.0,
            current_l3: 0.0,
            power_factor: 0.0,
            frequency: 60.0,
            insulation_tested: false,
            insulation_resistance: 0.0,
            test_voltage: 0,
            contactors_condition: ComponentCondition::default(),
            relays_condition: ComponentCondition::default(),
            circuit_breakers_condition: ComponentCondition::default(),
            fuses_condition: ComponentCondition::default(),
            terminals_condition: ComponentCondition::default(),
            wiring_condition: ComponentCondition::default(),
            controls_condition: ComponentCondition::default(),
            grounding_condition: ComponentCondition::default(),
        }
    }
}

/// HVAC category section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HvacSection {
    pub supply_temp: f64,
    pub return_temp: f64,
    pub ambient_temp: f64,
    pub temp_differential: f64,
    pub suction_pressure: f64,
    pub discharge_pressure: f64,
    pub static_pressure: f64,
    pub refrigerant_type: RefrigerantType,
    pub refrigerant_added: f64,
    pub refrigerant_recovered: f64,
    pub superheat: f64,
    pub subcooling: f64,
    pub filters_condition: ComponentCondition,
    pub coils_condition: ComponentCondition,
    pub condensate_drain_condition: ComponentCondition,
    pub blower_fan_condition: ComponentCondition,
    pub compressor_condition: ComponentCondition,
    pub electrical_connections_condition: ComponentCondition,
    pub ductwork_condition: ComponentCondition,
    pub thermostat_condition: ComponentCondition,
}

/// Plumbing category section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlumbingSection {
    pub water_pressure: f64,
    pub flow_rate: f64,
    pub leak_test_performed: bool,
    pub leak_test_method: LeakTestMethod,
    pub leak_test_result: LeakTestResult,
    pub water_quality_tested: bool,
    pub ph_level: f64,
    pub tds_level: i64,
    pub pipes_condition: ComponentCondition,
    pub fittings_condition: ComponentCondition,
    pub valves_condition: ComponentCondition,
    pub fixtures_condition: ComponentCondition,
    pub drains_condition: ComponentCondition,
    pub traps_condition: ComponentCondition,
    pub water_heater_condition: ComponentCondition,
    pub pumps_condition: ComponentCondition,
}

/// The category-specific section, tagged by equipment category
#[derive(Debug, Clone, PartialEq)]
pub enum CategorySection {
    Mechanical(MechanicalSection),
    Electrical(ElectricalSection),
    Hvac(HvacSection),
    Plumbing(PlumbingSection),
}

impl CategorySection {
    /// An empty section for the given category
    pub fn default_for(category: Category) -> Self {
        match category {
            Category::Mechanical => CategorySection::Mechanical(MechanicalSection::default()),
            Category::Electrical => CategorySection::Electrical(ElectricalSection::default()),
            Category::Hvac => CategorySection::Hvac(HvacSection::default()),
            Category::Plumbing => CategorySection::Plumbing(PlumbingSection::default()),
        }
    }

    /// The category this section belongs to
    pub fn category(&self) -> Category {
        match self {
            CategorySection::Mechanical(_) => Category::Mechanical,
            CategorySection::Electrical(_) => Category::Electrical,
            CategorySection::Hvac(_) => Category::Hvac,
            CategorySection::Plumbing(_) => Category::Plumbing,
        }
    }
}

/// An ad hoc temperature reading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureReading {
    pub location: String,
    pub temperature: f64,
}

/// A named ad hoc measurement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomMeasurement {
    pub name: String,
    pub value: String,
    pub unit: String,
}

/// Measurements section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementsSection {
    pub vibration_measured: bool,
    pub vibration_level: f64,
    pub vibration_location: String,
    pub temp_measured: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub temperature_readings: Vec<TemperatureReading>,
    pub noise_measured: bool,
    pub noise_level: i64,
    pub noise_description: NoiseDescription,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_measurements: Vec<CustomMeasurement>,
}

/// A part or material line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartLine {
    pub part_number: String,
    pub description: String,
    pub quantity: i64,
    pub unit_cost: f64,
}

/// Parts and materials section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartsSection {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<PartLine>,
    pub additional_materials: String,
    pub parts_requested: String,
}

/// Provenance block; the viewer never renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub work_order_id: String,
    pub equipment_id: String,
    pub craftsman_id: String,
    pub report_date: String,
    pub equipment_type: Category,
}

/// A complete report document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub general: GeneralSection,
    pub inspection: InspectionSection,
    pub category: CategorySection,
    pub measurements: MeasurementsSection,
    pub parts: PartsSection,
    pub metadata: Metadata,
}

impl Document {
    /// The equipment category this document was filed under
    pub fn category(&self) -> Category {
        self.category.category()
    }

    /// Serialize to the stored JSON payload
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("general", &self.general)?;
        map.serialize_entry("inspection", &self.inspection)?;
        match &self.category {
            CategorySection::Mechanical(s) => map.serialize_entry("mechanical", s)?,
            CategorySection::Electrical(s) => map.serialize_entry("electrical", s)?,
            CategorySection::Hvac(s) => map.serialize_entry("hvac", s)?,
            CategorySection::Plumbing(s) => map.serialize_entry("plumbing", s)?,
        }
        map.serialize_entry("measurements", &self.measurements)?;
        map.serialize_entry("parts", &self.parts)?;
        map.serialize_entry("metadata", &self.metadata)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            general: GeneralSection,
            inspection: InspectionSection,
            #[serde(default)]
            mechanical: Option<MechanicalSection>,
            #[serde(default)]
            electrical: Option<ElectricalSection>,
            #[serde(default)]
            hvac: Option<HvacSection>,
            #[serde(default)]
            plumbing: Option<PlumbingSection>,
            measurements: MeasurementsSection,
            parts: PartsSection,
            metadata: Metadata,
        }

        let repr = Repr::deserialize(deserializer)?;

        let mut categories: Vec<CategorySection> = Vec::new();
        if let Some(s) = repr.mechanical {
            categories.push(CategorySection::Mechanical(s));
        }
        if let Some(s) = repr.electrical {
            categories.push(CategorySection::Electrical(s));
        }
        if let Some(s) = repr.hvac {
            categories.push(CategorySection::Hvac(s));
        }
        if let Some(s) = repr.plumbing {
            categories.push(CategorySection::Plumbing(s));
        }

        if categories.len() != 1 {
            return Err(serde::de::Error::custom(format!(
                "document must contain exactly one category section, found {}",
                categories.len()
            )));
        }

        Ok(Document {
            general: repr.general,
            inspection: repr.inspection,
            category: categories.remove(0),
            measurements: repr.measurements,
            parts: repr.parts,
            metadata: repr.metadata,
        })
    }
}

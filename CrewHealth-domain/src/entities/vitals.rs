use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::selection::{SelectionSet, Symptom};

/// Unit the temperature field is entered in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,

    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// The other unit
    pub fn other(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Input fields of the daily health-check form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum VitalField {
    Temperature,
    HeartRate,
    Systolic,
    Diastolic,
    OxygenSaturation,
    RespiratoryRate,
    WeightKg,
    SleepHours,
    WaterLiters,
}

/// Error key shared by systolic and diastolic so both inputs highlight together
pub const BLOOD_PRESSURE_KEY: &str = "blood_pressure";

impl VitalField {
    /// All fields in form order
    pub const ALL: [VitalField; 9] = [
        VitalField::Temperature,
        VitalField::HeartRate,
        VitalField::Systolic,
        VitalField::Diastolic,
        VitalField::OxygenSaturation,
        VitalField::RespiratoryRate,
        VitalField::WeightKg,
        VitalField::SleepHours,
        VitalField::WaterLiters,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VitalField::Temperature => "temperature",
            VitalField::HeartRate => "heart_rate",
            VitalField::Systolic => "systolic",
            VitalField::Diastolic => "diastolic",
            VitalField::OxygenSaturation => "oxygen_saturation",
            VitalField::RespiratoryRate => "respiratory_rate",
            VitalField::WeightKg => "weight_kg",
            VitalField::SleepHours => "sleep_hours",
            VitalField::WaterLiters => "water_liters",
        }
    }

    /// Human-readable label used in validation messages
    pub fn label(self) -> &'static str {
        match self {
            VitalField::Temperature => "Temperature",
            VitalField::HeartRate => "Heart rate",
            VitalField::Systolic | VitalField::Diastolic => "Blood pressure",
            VitalField::OxygenSaturation => "Oxygen saturation",
            VitalField::RespiratoryRate => "Respiratory rate",
            VitalField::WeightKg => "Weight",
            VitalField::SleepHours => "Sleep",
            VitalField::WaterLiters => "Water intake",
        }
    }

    /// Key the field's failures are reported under
    pub fn error_key(self) -> &'static str {
        match self {
            VitalField::Systolic | VitalField::Diastolic => BLOOD_PRESSURE_KEY,
            other => other.name(),
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, VitalField::WeightKg | VitalField::SleepHours | VitalField::WaterLiters)
    }

    /// Inclusive valid range; only temperature depends on the unit
    pub fn range(self, unit: TemperatureUnit) -> (f64, f64) {
        match self {
            VitalField::Temperature => match unit {
                TemperatureUnit::Celsius => (35.0, 42.0),
                TemperatureUnit::Fahrenheit => (95.0, 107.6),
            },
            VitalField::HeartRate => (40.0, 200.0),
            VitalField::Systolic => (70.0, 200.0),
            VitalField::Diastolic => (40.0, 130.0),
            VitalField::OxygenSaturation => (70.0, 100.0),
            VitalField::RespiratoryRate => (10.0, 40.0),
            VitalField::WeightKg => (20.0, 250.0),
            VitalField::SleepHours => (0.0, 24.0),
            VitalField::WaterLiters => (0.0, 10.0),
        }
    }

    pub fn unit_suffix(self, unit: TemperatureUnit) -> &'static str {
        match self {
            VitalField::Temperature => unit.symbol(),
            VitalField::HeartRate => "BPM",
            VitalField::Systolic | VitalField::Diastolic => "mmHg",
            VitalField::OxygenSaturation => "%",
            VitalField::RespiratoryRate => "breaths/min",
            VitalField::WeightKg => "kg",
            VitalField::SleepHours => "hours",
            VitalField::WaterLiters => "L",
        }
    }
}

impl fmt::Display for VitalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of reading one raw text input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedValue {
    /// Empty or whitespace only
    Blank,
    /// Text that is not a finite number
    Invalid,
    Number(f64),
}

impl ParsedValue {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return ParsedValue::Blank;
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => ParsedValue::Number(value),
            _ => ParsedValue::Invalid,
        }
    }

    pub fn number(self) -> Option<f64> {
        match self {
            ParsedValue::Number(value) => Some(value),
            _ => None,
        }
    }
}

/// Raw form state for a health check, one text value per input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(default)]
pub struct VitalsForm {
    pub temperature: String,
    pub heart_rate: String,
    pub systolic: String,
    pub diastolic: String,
    pub oxygen_saturation: String,
    pub respiratory_rate: String,
    pub weight_kg: String,
    pub sleep_hours: String,
    pub water_liters: String,

    /// Symptoms ticked on the form
    #[cfg_attr(feature = "with-api", schema(value_type = Vec<Symptom>))]
    pub symptoms: SelectionSet<Symptom>,

    pub notes: String,
}

impl VitalsForm {
    /// Raw text of a field
    pub fn value(&self, field: VitalField) -> &str {
        match field {
            VitalField::Temperature => &self.temperature,
            VitalField::HeartRate => &self.heart_rate,
            VitalField::Systolic => &self.systolic,
            VitalField::Diastolic => &self.diastolic,
            VitalField::OxygenSaturation => &self.oxygen_saturation,
            VitalField::RespiratoryRate => &self.respiratory_rate,
            VitalField::WeightKg => &self.weight_kg,
            VitalField::SleepHours => &self.sleep_hours,
            VitalField::WaterLiters => &self.water_liters,
        }
    }

    pub fn set(&mut self, field: VitalField, text: impl Into<String>) {
        let slot = match field {
            VitalField::Temperature => &mut self.temperature,
            VitalField::HeartRate => &mut self.heart_rate,
            VitalField::Systolic => &mut self.systolic,
            VitalField::Diastolic => &mut self.diastolic,
            VitalField::OxygenSaturation => &mut self.oxygen_saturation,
            VitalField::RespiratoryRate => &mut self.respiratory_rate,
            VitalField::WeightKg => &mut self.weight_kg,
            VitalField::SleepHours => &mut self.sleep_hours,
            VitalField::WaterLiters => &mut self.water_liters,
        };
        *slot = text.into();
    }

    pub fn parsed(&self, field: VitalField) -> ParsedValue {
        ParsedValue::parse(self.value(field))
    }

    /// Numeric view of the form; blank or unparseable inputs become `None`
    pub fn reading(&self, unit: TemperatureUnit) -> VitalsReading {
        VitalsReading {
            temperature: self.parsed(VitalField::Temperature).number(),
            temperature_unit: unit,
            heart_rate: self.parsed(VitalField::HeartRate).number(),
            systolic: self.parsed(VitalField::Systolic).number(),
            diastolic: self.parsed(VitalField::Diastolic).number(),
            oxygen_saturation: self.parsed(VitalField::OxygenSaturation).number(),
            respiratory_rate: self.parsed(VitalField::RespiratoryRate).number(),
            weight_kg: self.parsed(VitalField::WeightKg).number(),
            sleep_hours: self.parsed(VitalField::SleepHours).number(),
            water_liters: self.parsed(VitalField::WaterLiters).number(),
        }
    }

    /// Form text for an already-numeric reading
    pub fn from_reading(reading: &VitalsReading) -> Self {
        let mut form = VitalsForm::default();
        for field in VitalField::ALL {
            if let Some(value) = reading.value(field) {
                form.set(field, value.to_string());
            }
        }
        form
    }
}

/// One set of vitals as numbers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalsReading {
    pub temperature: Option<f64>,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    pub heart_rate: Option<f64>,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub oxygen_saturation: Option<f64>,
    pub respiratory_rate: Option<f64>,
    pub weight_kg: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub water_liters: Option<f64>,
}

impl VitalsReading {
    pub fn value(&self, field: VitalField) -> Option<f64> {
        match field {
            VitalField::Temperature => self.temperature,
            VitalField::HeartRate => self.heart_rate,
            VitalField::Systolic => self.systolic,
            VitalField::Diastolic => self.diastolic,
            VitalField::OxygenSaturation => self.oxygen_saturation,
            VitalField::RespiratoryRate => self.respiratory_rate,
            VitalField::WeightKg => self.weight_kg,
            VitalField::SleepHours => self.sleep_hours,
            VitalField::WaterLiters => self.water_liters,
        }
    }
}

/// Field-level validation failures keyed by error key.
///
/// An empty result means the reading may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record a failure; the first message for a key is kept
    pub fn add(&mut self, key: &str, message: impl Into<String>) {
        self.errors.entry(key.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Message for a field, looked up through its error key
    pub fn error_for(&self, field: VitalField) -> Option<&str> {
        self.get(field.error_key())
    }

    pub fn has_error(&self, field: VitalField) -> bool {
        self.error_for(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.errors
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", key, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Blood pressure category based on measurements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BloodPressureCategory {
    /// Normal blood pressure (systolic < 120 and diastolic < 80)
    Normal,

    /// Elevated blood pressure (systolic 120-129 and diastolic < 80)
    Elevated,

    /// Stage 1 Hypertension (systolic 130-139 or diastolic 80-89)
    Hypertension1,

    /// Stage 2 Hypertension (systolic 140-179 or diastolic 90-119)
    Hypertension2,

    /// Hypertensive crisis (systolic ≥ 180 or diastolic ≥ 120)
    HypertensiveCrisis,
}

impl BloodPressureCategory {
    pub fn label(self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Elevated => "Elevated",
            BloodPressureCategory::Hypertension1 => "Hypertension stage 1",
            BloodPressureCategory::Hypertension2 => "Hypertension stage 2",
            BloodPressureCategory::HypertensiveCrisis => "Hypertensive crisis",
        }
    }
}

impl fmt::Display for BloodPressureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse advisory risk classification of a reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
        };
        f.write_str(label)
    }
}

/// Derived display values for a reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AssessmentSummary {
    /// `None` while either pressure value is missing
    pub blood_pressure_category: Option<BloodPressureCategory>,

    /// Display label for the category; `None` renders as a placeholder
    pub blood_pressure_label: Option<String>,

    pub risk_tier: RiskTier,
}

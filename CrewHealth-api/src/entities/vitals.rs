use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crew_health_domain::entities::{
    AssessmentSummary, SelectionSet, Symptom, TemperatureUnit, VitalField, VitalsForm, VitalsReading,
};

/// A form value sent either as a JSON number or as the text typed by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum VitalValue {
    Number(f64),
    Text(String),
}

impl VitalValue {
    fn into_text(self) -> String {
        match self {
            VitalValue::Number(n) => n.to_string(),
            VitalValue::Text(s) => s,
        }
    }
}

/// Raw vitals as entered; every field may be omitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RawVitals {
    pub temperature: Option<VitalValue>,
    pub heart_rate: Option<VitalValue>,
    pub systolic: Option<VitalValue>,
    pub diastolic: Option<VitalValue>,
    pub oxygen_saturation: Option<VitalValue>,
    pub respiratory_rate: Option<VitalValue>,
    pub weight_kg: Option<VitalValue>,
    pub sleep_hours: Option<VitalValue>,
    pub water_liters: Option<VitalValue>,
}

impl RawVitals {
    /// Form state equivalent to these values, without symptoms or notes
    pub fn into_form(self) -> VitalsForm {
        let mut form = VitalsForm::default();
        let values = [
            (VitalField::Temperature, self.temperature),
            (VitalField::HeartRate, self.heart_rate),
            (VitalField::Systolic, self.systolic),
            (VitalField::Diastolic, self.diastolic),
            (VitalField::OxygenSaturation, self.oxygen_saturation),
            (VitalField::RespiratoryRate, self.respiratory_rate),
            (VitalField::WeightKg, self.weight_kg),
            (VitalField::SleepHours, self.sleep_hours),
            (VitalField::WaterLiters, self.water_liters),
        ];
        for (field, value) in values {
            if let Some(value) = value {
                form.set(field, value.into_text());
            }
        }
        form
    }
}

/// Request to validate and assess a reading
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssessVitalsRequest {
    /// Unit of the temperature value (default: C)
    #[serde(default)]
    pub unit: TemperatureUnit,

    #[serde(default)]
    pub vitals: RawVitals,
}

/// Validation outcome and derived summary for a reading
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessmentResponse {
    /// True when no field failed validation
    pub valid: bool,

    /// Error key to message; `systolic` and `diastolic` report under `blood_pressure`
    pub errors: BTreeMap<String, String>,

    /// Parsed values; unparseable inputs are null
    pub reading: VitalsReading,

    pub summary: AssessmentSummary,
}

/// Request to convert a temperature
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConvertTemperatureRequest {
    pub value: f64,
    pub from: TemperatureUnit,
    pub to: TemperatureUnit,
}

/// Converted temperature rounded to one decimal
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConvertTemperatureResponse {
    pub value: f64,
    pub unit: TemperatureUnit,
}

/// Daily health-check submission
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HealthCheckRequest {
    pub crew_id: String,

    #[serde(default)]
    pub unit: TemperatureUnit,

    #[serde(default)]
    pub vitals: RawVitals,

    #[serde(default)]
    pub symptoms: Vec<Symptom>,

    pub notes: Option<String>,

    /// RFC 3339 time of measurement (default: now)
    pub recorded_at: Option<String>,
}

impl HealthCheckRequest {
    /// Full form state for the submission
    pub fn form(&self) -> VitalsForm {
        let mut form = self.vitals.clone().into_form();
        form.symptoms = self.symptoms.iter().copied().collect::<SelectionSet<Symptom>>();
        form.notes = self.notes.clone().unwrap_or_default();
        form
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::selection::{SelectionSet, Symptom};
use super::vitals::{AssessmentSummary, VitalsReading};

/// Kinds of record kept in a crew member's health file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    HealthCheck,
    SymptomReport,
    Examination,
    ChronicCondition,
    Vaccination,
    MentalHealth,
    EmergencyAlert,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::HealthCheck => "health_check",
            RecordType::SymptomReport => "symptom_report",
            RecordType::Examination => "examination",
            RecordType::ChronicCondition => "chronic_condition",
            RecordType::Vaccination => "vaccination",
            RecordType::MentalHealth => "mental_health",
            RecordType::EmergencyAlert => "emergency_alert",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health_check" => Ok(RecordType::HealthCheck),
            "symptom_report" => Ok(RecordType::SymptomReport),
            "examination" => Ok(RecordType::Examination),
            "chronic_condition" => Ok(RecordType::ChronicCondition),
            "vaccination" => Ok(RecordType::Vaccination),
            "mental_health" => Ok(RecordType::MentalHealth),
            "emergency_alert" => Ok(RecordType::EmergencyAlert),
            other => Err(format!("Unknown record type: {}", other)),
        }
    }
}

/// A stored health record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthRecord {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Crew member the record belongs to
    pub crew_id: String,

    /// One of the `RecordType` names
    pub record_type: String,

    /// When the observation was made (RFC 3339)
    pub recorded_at: String,

    /// Type-specific body
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub payload: serde_json::Value,

    pub notes: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

/// Request payload for creating a health record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateHealthRecordRequest {
    #[validate(length(min = 1, max = 64, message = "Crew ID must be between 1 and 64 characters"))]
    pub crew_id: String,

    #[validate(custom = "validate_record_type")]
    pub record_type: String,

    /// When the observation was made; must not be in the future
    #[validate(custom = "validate_recorded_at")]
    pub recorded_at: String,

    #[serde(default)]
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub payload: serde_json::Value,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UpdateHealthRecordRequest {
    #[validate(custom = "validate_recorded_at")]
    pub recorded_at: Option<String>,

    #[cfg_attr(feature = "with-api", schema(value_type = Option<Object>))]
    pub payload: Option<serde_json::Value>,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// Query over stored records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub crew_id: Option<String>,
    pub record_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Newest first unless set to `false`
    pub sort_desc: Option<bool>,
}

/// Payload stored with a `health_check` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthCheckPayload {
    pub reading: VitalsReading,

    #[serde(default)]
    #[cfg_attr(feature = "with-api", schema(value_type = Vec<Symptom>))]
    pub symptoms: SelectionSet<Symptom>,

    /// Summary computed when the record was accepted
    pub summary: Option<AssessmentSummary>,
}

fn validate_record_type(record_type: &str) -> Result<(), ValidationError> {
    match RecordType::from_str(record_type) {
        Ok(_) => Ok(()),
        Err(_) => {
            let mut error = ValidationError::new("record_type");
            error.message = Some(format!("Unknown record type: {}", record_type).into());
            Err(error)
        }
    }
}

fn validate_recorded_at(recorded_at: &str) -> Result<(), ValidationError> {
    let parsed = DateTime::parse_from_rfc3339(recorded_at).map_err(|_| {
        let mut error = ValidationError::new("timestamp");
        error.message = Some("Invalid timestamp format, expected RFC 3339".into());
        error
    })?;

    if parsed.with_timezone(&Utc) > Utc::now() {
        let mut error = ValidationError::new("future");
        error.message = Some("Recorded time cannot be in the future".into());
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(recorded_at: &str) -> CreateHealthRecordRequest {
        CreateHealthRecordRequest {
            crew_id: "crew-1".to_string(),
            record_type: "vaccination".to_string(),
            recorded_at: recorded_at.to_string(),
            payload: serde_json::json!({}),
            notes: None,
        }
    }

    #[test]
    fn test_record_type_names() {
        for name in ["health_check", "mental_health", "emergency_alert"] {
            assert_eq!(RecordType::from_str(name).unwrap().as_str(), name);
        }
        assert!(RecordType::from_str("haircut").is_err());
        assert_eq!(
            serde_json::to_string(&RecordType::ChronicCondition).unwrap(),
            "\"chronic_condition\""
        );
    }

    #[test]
    fn test_create_request_validation() {
        assert!(request("2024-03-01T09:30:00Z").validate().is_ok());
        assert!(request("yesterday").validate().is_err());

        let future = (Utc::now() + chrono::Duration::days(1)).to_rfc3339();
        let errors = request(&future).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("recorded_at"));

        let mut bad = request("2024-03-01T09:30:00Z");
        bad.crew_id = String::new();
        bad.record_type = "haircut".to_string();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("crew_id"));
        assert!(fields.contains_key("record_type"));
    }

    #[test]
    fn test_update_request_validation() {
        assert!(UpdateHealthRecordRequest::default().validate().is_ok());

        let update = UpdateHealthRecordRequest {
            recorded_at: Some("not a date".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}

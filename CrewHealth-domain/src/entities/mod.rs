// Domain entities and value objects
pub mod conversions;
pub mod health_record;
pub mod selection;
pub mod vitals;

// Re-export common types for easier imports
pub use health_record::{
    CreateHealthRecordRequest, HealthCheckPayload, HealthRecord, RecordFilter, RecordType,
    UpdateHealthRecordRequest,
};
pub use selection::{SelectionSet, Symptom};
pub use vitals::{
    AssessmentSummary, BloodPressureCategory, RiskTier, TemperatureUnit, ValidationResult,
    VitalField, VitalsForm, VitalsReading,
};

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::entities::conversions;
use crate::entities::health_record::{
    CreateHealthRecordRequest, HealthCheckPayload, HealthRecord, RecordFilter, RecordType,
    UpdateHealthRecordRequest,
};
use crate::entities::vitals::{TemperatureUnit, ValidationResult, VitalsForm};
use crate::services::vitals;
use crew_health_data::repository::{HealthRecordRepository, HealthRecordRepositoryTrait, RepositoryError};

/// Health record service errors
#[derive(Debug, Error)]
pub enum HealthRecordServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Vitals failed assessment; carries the per-field messages
    #[error("Invalid vitals: {0}")]
    InvalidVitals(ValidationResult),

    /// Not found error
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// A health-check form handed in for persistence
#[derive(Debug, Clone)]
pub struct HealthCheckSubmission {
    pub crew_id: String,
    pub form: VitalsForm,
    pub unit: TemperatureUnit,
    /// Defaults to now
    pub recorded_at: Option<String>,
}

/// Build the record request for a health-check form.
///
/// Fails with the validation map when any field is invalid. The summary is
/// computed here, so stored records always carry an assessment that matches
/// their reading.
pub fn health_check_request(
    crew_id: &str,
    form: &VitalsForm,
    unit: TemperatureUnit,
    recorded_at: String,
) -> Result<CreateHealthRecordRequest, ValidationResult> {
    let validation = vitals::validate(form, unit);
    if !validation.is_valid() {
        return Err(validation);
    }

    let reading = form.reading(unit);
    let payload = HealthCheckPayload {
        reading,
        symptoms: form.symptoms.clone(),
        summary: Some(vitals::assess(&reading)),
    };

    let notes = form.notes.trim();

    Ok(CreateHealthRecordRequest {
        crew_id: crew_id.to_string(),
        record_type: RecordType::HealthCheck.as_str().to_string(),
        recorded_at,
        payload: encode_payload(&payload)?,
        notes: if notes.is_empty() { None } else { Some(notes.to_string()) },
    })
}

/// Payload as JSON; an encoding failure is reported under the `payload` key
fn encode_payload<T: serde::Serialize>(payload: &T) -> Result<serde_json::Value, ValidationResult> {
    serde_json::to_value(payload).map_err(|e| {
        let mut result = ValidationResult::new();
        result.add("payload", format!("Health check payload could not be encoded: {}", e));
        result
    })
}

/// Trait for health record service operations
#[async_trait]
pub trait HealthRecordServiceTrait: Send + Sync {
    /// Validate a create request
    fn validate_create_request(&self, request: &CreateHealthRecordRequest) -> Result<(), HealthRecordServiceError>;

    /// Create a record; health-check payloads are assessed before storing
    async fn create_record(&self, request: CreateHealthRecordRequest) -> Result<HealthRecord, HealthRecordServiceError>;

    /// Assess and store a health-check form
    async fn submit_health_check(&self, submission: HealthCheckSubmission) -> Result<HealthRecord, HealthRecordServiceError>;

    /// Get a record by ID
    async fn get_record(&self, id: &str) -> Result<HealthRecord, HealthRecordServiceError>;

    /// Apply a partial update
    async fn update_record(&self, id: &str, update: UpdateHealthRecordRequest) -> Result<HealthRecord, HealthRecordServiceError>;

    /// Delete a record
    async fn delete_record(&self, id: &str) -> Result<(), HealthRecordServiceError>;

    /// Filtered, paginated listing with the total match count
    async fn list_records(&self, filter: RecordFilter) -> Result<(Vec<HealthRecord>, usize), HealthRecordServiceError>;
}

/// Health record service for domain logic
pub struct HealthRecordService<R: HealthRecordRepositoryTrait> {
    repository: R,
}

impl<R: HealthRecordRepositoryTrait> HealthRecordService<R> {
    /// Create a new health record service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> HealthRecordServiceError {
        match err {
            RepositoryError::NotFound(msg) => HealthRecordServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => HealthRecordServiceError::ValidationError(msg),
            _ => HealthRecordServiceError::RepositoryError(err.to_string()),
        }
    }

    fn parse_id(id: &str) -> Result<uuid::Uuid, HealthRecordServiceError> {
        conversions::parse_string_to_uuid(id).map_err(HealthRecordServiceError::ValidationError)
    }
}

/// Re-assess a health-check payload, replacing any client-supplied summary
fn assess_health_check_payload(payload: &serde_json::Value) -> Result<serde_json::Value, HealthRecordServiceError> {
    let mut payload: HealthCheckPayload = serde_json::from_value(payload.clone()).map_err(|e| {
        HealthRecordServiceError::ValidationError(format!("Invalid health check payload: {}", e))
    })?;

    let validation = vitals::validate_reading(&payload.reading);
    if !validation.is_valid() {
        warn!("Rejected health check payload: {}", validation);
        return Err(HealthRecordServiceError::InvalidVitals(validation));
    }

    payload.summary = Some(vitals::assess(&payload.reading));
    serde_json::to_value(payload)
        .map_err(|e| HealthRecordServiceError::ValidationError(format!("Invalid health check payload: {}", e)))
}

fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect();
    fields.sort();
    fields.join("; ")
}

#[async_trait]
impl<R: HealthRecordRepositoryTrait + Send + Sync> HealthRecordServiceTrait for HealthRecordService<R> {
    fn validate_create_request(&self, request: &CreateHealthRecordRequest) -> Result<(), HealthRecordServiceError> {
        request
            .validate()
            .map_err(|errors| HealthRecordServiceError::ValidationError(describe_validation_errors(&errors)))?;

        if request.crew_id.trim().is_empty() {
            return Err(HealthRecordServiceError::ValidationError(
                "crew_id: Crew ID cannot be blank".to_string(),
            ));
        }

        Ok(())
    }

    async fn create_record(&self, mut request: CreateHealthRecordRequest) -> Result<HealthRecord, HealthRecordServiceError> {
        self.validate_create_request(&request)?;

        if request.record_type == RecordType::HealthCheck.as_str() {
            request.payload = assess_health_check_payload(&request.payload)?;
        }

        let data_request = conversions::convert_to_data_create_request(&request);
        let record = self
            .repository
            .create(data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Created {} record {} for {}", record.record_type, record.id, record.crew_id);
        Ok(conversions::convert_to_domain_record(record))
    }

    async fn submit_health_check(&self, submission: HealthCheckSubmission) -> Result<HealthRecord, HealthRecordServiceError> {
        let recorded_at = submission
            .recorded_at
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let request = health_check_request(&submission.crew_id, &submission.form, submission.unit, recorded_at)
            .map_err(|validation| {
                warn!("Rejected health check for {}: {}", submission.crew_id, validation);
                HealthRecordServiceError::InvalidVitals(validation)
            })?;

        self.create_record(request).await
    }

    async fn get_record(&self, id: &str) -> Result<HealthRecord, HealthRecordServiceError> {
        let uuid = Self::parse_id(id)?;

        match self.repository.get_by_id(uuid).await {
            Ok(Some(record)) => Ok(conversions::convert_to_domain_record(record)),
            Ok(None) => Err(HealthRecordServiceError::NotFound(format!("Record with ID {} not found", id))),
            Err(e) => Err(self.map_repo_error(e)),
        }
    }

    async fn update_record(&self, id: &str, mut update: UpdateHealthRecordRequest) -> Result<HealthRecord, HealthRecordServiceError> {
        let uuid = Self::parse_id(id)?;

        update
            .validate()
            .map_err(|errors| HealthRecordServiceError::ValidationError(describe_validation_errors(&errors)))?;

        if let Some(payload) = update.payload.as_ref() {
            let existing = self.get_record(id).await?;
            if existing.record_type == RecordType::HealthCheck.as_str() {
                update.payload = Some(assess_health_check_payload(payload)?);
            }
        }

        let data_update = conversions::convert_to_data_update_request(&update);
        match self.repository.update(uuid, data_update).await {
            Ok(Some(record)) => {
                info!("Updated record {}", record.id);
                Ok(conversions::convert_to_domain_record(record))
            }
            Ok(None) => Err(HealthRecordServiceError::NotFound(format!("Record with ID {} not found", id))),
            Err(e) => Err(self.map_repo_error(e)),
        }
    }

    async fn delete_record(&self, id: &str) -> Result<(), HealthRecordServiceError> {
        let uuid = Self::parse_id(id)?;

        match self.repository.delete(uuid).await {
            Ok(true) => {
                info!("Deleted record {}", id);
                Ok(())
            }
            Ok(false) => Err(HealthRecordServiceError::NotFound(format!("Record with ID {} not found", id))),
            Err(e) => Err(self.map_repo_error(e)),
        }
    }

    async fn list_records(&self, filter: RecordFilter) -> Result<(Vec<HealthRecord>, usize), HealthRecordServiceError> {
        if let Some(record_type) = filter.record_type.as_deref() {
            record_type
                .parse::<RecordType>()
                .map_err(HealthRecordServiceError::ValidationError)?;
        }

        let data_filter = conversions::convert_to_data_filter(&filter);
        let (records, total) = self
            .repository
            .get_filtered(data_filter)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok((
            records.into_iter().map(conversions::convert_to_domain_record).collect(),
            total,
        ))
    }
}

/// Health record service over the default repository
pub fn create_default_health_record_service() -> impl HealthRecordServiceTrait {
    HealthRecordService::new(HealthRecordRepository::new())
}

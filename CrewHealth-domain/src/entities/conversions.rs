use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::health_record::{
    CreateHealthRecordRequest, HealthRecord, RecordFilter, UpdateHealthRecordRequest,
};
use crew_health_data::models::health_record as data;

/// Conversion functions between domain entities and data models.
/// They follow the pattern convert_to_[target_layer]_[model_name].

/// Parse a string ID to UUID with a descriptive error
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid UUID format: {}", id))
}

/// Normalize an RFC 3339 timestamp to UTC so stored values sort lexically.
///
/// Unparseable input is returned unchanged.
pub fn normalize_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed.with_timezone(&Utc).to_rfc3339(),
        Err(_) => timestamp.to_string(),
    }
}

/// Convert from data model to domain entity for a health record
pub fn convert_to_domain_record(record: data::HealthRecord) -> HealthRecord {
    HealthRecord {
        id: record.id,
        crew_id: record.crew_id,
        record_type: record.record_type,
        recorded_at: record.recorded_at,
        payload: record.payload,
        notes: record.notes,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// Convert from domain entity to data model for a create request
pub fn convert_to_data_create_request(request: &CreateHealthRecordRequest) -> data::CreateHealthRecordRequest {
    data::CreateHealthRecordRequest {
        crew_id: request.crew_id.trim().to_string(),
        record_type: request.record_type.clone(),
        recorded_at: normalize_timestamp(&request.recorded_at),
        payload: request.payload.clone(),
        notes: request.notes.clone(),
    }
}

/// Convert from domain entity to data model for an update request
pub fn convert_to_data_update_request(update: &UpdateHealthRecordRequest) -> data::UpdateHealthRecordRequest {
    data::UpdateHealthRecordRequest {
        recorded_at: update.recorded_at.as_deref().map(normalize_timestamp),
        payload: update.payload.clone(),
        notes: update.notes.clone(),
    }
}

/// Convert from domain filter to data model filter
pub fn convert_to_data_filter(filter: &RecordFilter) -> data::HealthRecordFilter {
    data::HealthRecordFilter {
        crew_id: filter.crew_id.clone(),
        record_type: filter.record_type.clone(),
        start_date: filter.start_date.as_deref().map(normalize_timestamp),
        end_date: filter.end_date.as_deref().map(normalize_timestamp),
        limit: filter.limit,
        offset: filter.offset,
        sort_desc: filter.sort_desc,
    }
}

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crew_health_domain::entities::{
    CreateHealthRecordRequest as DomainCreateRequest, HealthRecord as DomainHealthRecord,
    UpdateHealthRecordRequest as DomainUpdateRequest,
};

/// A crew health record as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRecordResponse {
    pub id: String,
    pub crew_id: String,
    /// health_check, symptom_report, examination, chronic_condition, vaccination, mental_health or emergency_alert
    pub record_type: String,
    pub recorded_at: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DomainHealthRecord> for HealthRecordResponse {
    fn from(record: DomainHealthRecord) -> Self {
        Self {
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
}

/// Request to create a record of any type
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecordRequest {
    pub crew_id: String,
    pub record_type: String,
    /// RFC 3339 time of observation (default: now)
    pub recorded_at: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    pub notes: Option<String>,
}

impl CreateRecordRequest {
    pub fn into_domain(self) -> DomainCreateRequest {
        DomainCreateRequest {
            crew_id: self.crew_id,
            record_type: self.record_type,
            recorded_at: self.recorded_at.unwrap_or_else(|| Utc::now().to_rfc3339()),
            payload: self.payload,
            notes: self.notes,
        }
    }
}

/// Partial record update; omitted fields are unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecordRequest {
    pub recorded_at: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub payload: Option<serde_json::Value>,
    pub notes: Option<String>,
}

impl UpdateRecordRequest {
    pub fn into_domain(self) -> DomainUpdateRequest {
        DomainUpdateRequest {
            recorded_at: self.recorded_at,
            payload: self.payload,
            notes: self.notes,
        }
    }
}

/// Query parameters for listing records
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct RecordQueryParams {
    /// Restrict to one crew member
    pub crew_id: Option<String>,

    /// Restrict to one record type
    pub record_type: Option<String>,

    /// RFC 3339 inclusive lower bound on recorded_at
    pub start_date: Option<String>,

    /// RFC 3339 inclusive upper bound on recorded_at
    pub end_date: Option<String>,

    /// Maximum number of results (default: 100, max: 1000)
    pub limit: Option<usize>,

    /// Pagination offset (default: 0)
    pub offset: Option<usize>,

    /// Sort direction (asc/desc, default: desc)
    pub sort: Option<String>,
}

impl RecordQueryParams {
    /// Query string for the same filter at another offset
    pub fn page_query(&self, limit: usize, offset: usize) -> String {
        let mut parts = Vec::new();

        if let Some(crew_id) = &self.crew_id {
            parts.push(format!("crew_id={}", crew_id));
        }
        if let Some(record_type) = &self.record_type {
            parts.push(format!("record_type={}", record_type));
        }
        if let Some(start) = &self.start_date {
            parts.push(format!("start_date={}", start));
        }
        if let Some(end) = &self.end_date {
            parts.push(format!("end_date={}", end));
        }
        parts.push(format!("limit={}", limit));
        parts.push(format!("offset={}", offset));
        if let Some(sort) = &self.sort {
            parts.push(format!("sort={}", sort));
        }

        format!("?{}", parts.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_recorded_at() {
        let request: CreateRecordRequest = serde_json::from_value(serde_json::json!({
            "crew_id": "crew-1",
            "record_type": "vaccination"
        }))
        .unwrap();

        let domain = request.into_domain();
        assert!(chrono::DateTime::parse_from_rfc3339(&domain.recorded_at).is_ok());
        assert_eq!(domain.payload, serde_json::Value::Null);
    }

    #[test]
    fn test_page_query() {
        let params = RecordQueryParams {
            crew_id: Some("crew-1".to_string()),
            sort: Some("asc".to_string()),
            ..Default::default()
        };
        assert_eq!(params.page_query(10, 20), "?crew_id=crew-1&limit=10&offset=20&sort=asc");
    }
}

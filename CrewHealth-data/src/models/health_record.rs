use serde::{Deserialize, Serialize};

/// Storage model for a crew health record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Unique identifier for the record
    pub id: String,

    /// Crew member the record belongs to
    pub crew_id: String,

    /// Record type used for filtering (e.g. health_check, vaccination)
    pub record_type: String,

    /// When the underlying observation was made (RFC 3339)
    pub recorded_at: String,

    /// Type-specific record body
    pub payload: serde_json::Value,

    /// Optional free-text notes
    pub notes: Option<String>,

    /// When the record was stored (RFC 3339)
    pub created_at: String,

    /// When the record was last changed (RFC 3339)
    pub updated_at: String,
}

/// Input data for creating a new health record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHealthRecordRequest {
    pub crew_id: String,
    pub record_type: String,
    pub recorded_at: String,
    pub payload: serde_json::Value,
    pub notes: Option<String>,
}

/// Partial update for an existing health record; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHealthRecordRequest {
    pub recorded_at: Option<String>,
    pub payload: Option<serde_json::Value>,
    pub notes: Option<String>,
}

/// Filter for listing health records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthRecordFilter {
    /// Restrict to one crew member
    pub crew_id: Option<String>,

    /// Restrict to one record type
    pub record_type: Option<String>,

    /// Inclusive lower bound on `recorded_at` (RFC 3339)
    pub start_date: Option<String>,

    /// Inclusive upper bound on `recorded_at` (RFC 3339)
    pub end_date: Option<String>,

    pub limit: Option<usize>,
    pub offset: Option<usize>,

    /// Newest first when true or unset
    pub sort_desc: Option<bool>,
}

impl HealthRecord {
    /// Apply a partial update, stamping `updated_at`
    pub fn apply_update(&mut self, update: UpdateHealthRecordRequest, updated_at: String) {
        if let Some(recorded_at) = update.recorded_at {
            self.recorded_at = recorded_at;
        }
        if let Some(payload) = update.payload {
            self.payload = payload;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
        self.updated_at = updated_at;
    }
}

impl HealthRecordFilter {
    /// Whether a record passes the crew, type and date constraints
    pub fn matches(&self, record: &HealthRecord) -> bool {
        if let Some(crew_id) = &self.crew_id {
            if &record.crew_id != crew_id {
                return false;
            }
        }

        if let Some(record_type) = &self.record_type {
            if &record.record_type != record_type {
                return false;
            }
        }

        if let Some(start_date) = &self.start_date {
            if record.recorded_at.as_str() < start_date.as_str() {
                return false;
            }
        }

        if let Some(end_date) = &self.end_date {
            if record.recorded_at.as_str() > end_date.as_str() {
                return false;
            }
        }

        true
    }
}

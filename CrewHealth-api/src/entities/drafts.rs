use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crew_health_domain::entities::{TemperatureUnit, VitalsForm};
use crew_health_domain::services::HealthCheckDraft;

/// Health-check form state to keep for later
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveDraftRequest {
    /// Active temperature unit (default: C)
    #[serde(default)]
    pub unit: TemperatureUnit,

    #[serde(default)]
    pub form: VitalsForm,
}

/// A crew member's saved draft
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DraftResponse {
    pub crew_id: String,
    pub unit: TemperatureUnit,
    pub form: VitalsForm,
    /// When the draft was written (RFC 3339)
    pub saved_at: Option<String>,
}

impl DraftResponse {
    pub fn new(crew_id: &str, draft: HealthCheckDraft) -> Self {
        Self {
            crew_id: crew_id.to_string(),
            unit: draft.unit,
            form: draft.form,
            saved_at: draft.saved_at,
        }
    }
}

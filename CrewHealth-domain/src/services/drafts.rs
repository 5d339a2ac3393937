use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::vitals::{TemperatureUnit, VitalsForm};
use crew_health_data::repository::{create_default_draft_store, DraftStore, RepositoryError};

/// Draft service errors
#[derive(Debug, Error)]
pub enum DraftError {
    /// No draft saved for the crew member
    #[error("No draft saved for crew member {0}")]
    NotFound(String),

    /// Crew identifier unusable as a key
    #[error("Invalid crew ID: {0}")]
    InvalidKey(String),

    /// Storage error
    #[error("Draft storage error: {0}")]
    Store(#[from] RepositoryError),

    /// Snapshot could not be encoded or decoded
    #[error("Draft encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Saved, unsubmitted health-check form state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthCheckDraft {
    pub form: VitalsForm,

    #[serde(default)]
    pub unit: TemperatureUnit,

    /// Set by the store when the snapshot was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

/// Store key for a crew member's health-check draft
pub fn draft_key(crew_id: &str) -> String {
    format!("health_check:{}", crew_id)
}

/// Typed access to health-check drafts on top of a `DraftStore`
#[derive(Clone)]
pub struct DraftService {
    store: Arc<dyn DraftStore>,
}

impl DraftService {
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn DraftStore> {
        self.store.clone()
    }

    fn key(crew_id: &str) -> Result<String, DraftError> {
        let crew_id = crew_id.trim();
        if crew_id.is_empty() {
            return Err(DraftError::InvalidKey("crew ID cannot be empty".to_string()));
        }
        Ok(draft_key(crew_id))
    }

    /// Load the crew member's draft, `None` if nothing is saved
    pub fn load(&self, crew_id: &str) -> Result<Option<HealthCheckDraft>, DraftError> {
        let key = Self::key(crew_id)?;

        match self.store.get(&key)? {
            Some(stored) => {
                let mut draft: HealthCheckDraft = serde_json::from_value(stored.value)?;
                draft.saved_at = Some(stored.saved_at);
                Ok(Some(draft))
            }
            None => {
                debug!("No draft for {}", key);
                Ok(None)
            }
        }
    }

    /// Replace the crew member's draft (last write wins)
    pub fn save(&self, crew_id: &str, form: &VitalsForm, unit: TemperatureUnit) -> Result<HealthCheckDraft, DraftError> {
        let key = Self::key(crew_id)?;

        let mut draft = HealthCheckDraft {
            form: form.clone(),
            unit,
            saved_at: None,
        };
        let stored = self.store.put(&key, serde_json::to_value(&draft)?)?;
        draft.saved_at = Some(stored.saved_at);

        info!("Saved health-check draft for {}", key);
        Ok(draft)
    }

    /// Remove the crew member's draft; returns whether one existed
    pub fn remove(&self, crew_id: &str) -> Result<bool, DraftError> {
        let key = Self::key(crew_id)?;
        let removed = self.store.remove(&key)?;
        if removed {
            info!("Removed health-check draft for {}", key);
        }
        Ok(removed)
    }
}

/// Draft service over the default store (database when a pool is initialized)
pub fn create_default_draft_service() -> DraftService {
    DraftService::new(create_default_draft_store())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::vitals::VitalField;
    use crew_health_data::repository::InMemoryDraftStore;

    #[test]
    fn test_save_load_remove() {
        let service = DraftService::new(Arc::new(InMemoryDraftStore::new()));
        assert!(service.load("crew-1").unwrap().is_none());

        let mut form = VitalsForm::default();
        form.set(VitalField::HeartRate, "72");
        service.save("crew-1", &form, TemperatureUnit::Fahrenheit).unwrap();

        form.set(VitalField::HeartRate, "75");
        let saved = service.save("crew-1", &form, TemperatureUnit::Celsius).unwrap();
        assert!(saved.saved_at.is_some());

        let loaded = service.load("crew-1").unwrap().unwrap();
        assert_eq!(loaded.form.heart_rate, "75");
        assert_eq!(loaded.unit, TemperatureUnit::Celsius);
        assert_eq!(loaded.saved_at, saved.saved_at);

        assert!(service.remove("crew-1").unwrap());
        assert!(!service.remove("crew-1").unwrap());
    }

    #[test]
    fn test_blank_crew_id_rejected() {
        let service = DraftService::new(Arc::new(InMemoryDraftStore::new()));
        assert!(matches!(service.load("  "), Err(DraftError::InvalidKey(_))));
    }

    #[test]
    fn test_corrupt_snapshot_is_an_encoding_error() {
        let store = Arc::new(InMemoryDraftStore::new());
        store.put(&draft_key("crew-1"), serde_json::json!("not a draft")).unwrap();

        let service = DraftService::new(store);
        assert!(matches!(service.load("crew-1"), Err(DraftError::Encoding(_))));
    }
}

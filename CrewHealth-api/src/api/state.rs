use std::sync::Arc;

use crew_health_data::repository::InMemoryDraftStore;
use crew_health_domain::services::{
    create_default_draft_service, create_default_health_record_service, DraftService,
    HealthRecordServiceTrait,
};

use crate::config::{AppConfig, DraftStoreKind};

/// Service type for dependency injection
pub type HealthRecordServiceHandle = Arc<dyn HealthRecordServiceTrait + Send + Sync>;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub records: HealthRecordServiceHandle,
    pub drafts: DraftService,
}

impl AppState {
    pub fn new(records: HealthRecordServiceHandle, drafts: DraftService) -> Self {
        Self { records, drafts }
    }

    /// Default services; drafts follow `DRAFT_STORE`
    pub fn from_config(config: &AppConfig) -> Self {
        let drafts = match config.draft_store {
            DraftStoreKind::Database => create_default_draft_service(),
            DraftStoreKind::Memory => DraftService::new(Arc::new(InMemoryDraftStore::new())),
        };

        Self::new(Arc::new(create_default_health_record_service()), drafts)
    }
}

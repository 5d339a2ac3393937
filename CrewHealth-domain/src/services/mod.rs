// Domain services
pub mod debounce;
pub mod drafts;
pub mod health_check_form;
pub mod health_records;
pub mod vitals;

// Re-export service traits and factory functions
pub use debounce::Debouncer;
pub use drafts::{create_default_draft_service, DraftError, DraftService, HealthCheckDraft};
pub use health_check_form::{FormError, HealthCheckForm};
pub use health_records::{
    create_default_health_record_service, HealthCheckSubmission, HealthRecordService,
    HealthRecordServiceError, HealthRecordServiceTrait,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use crate::testing::create_mock_health_record_service;

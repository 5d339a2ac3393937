// Repository module structure
pub mod errors;
pub mod drafts;
mod health_record;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use drafts::{create_default_draft_store, DatabaseDraftStore, DraftStore, InMemoryDraftStore, StoredDraft};
pub use health_record::{HealthRecordRepository, HealthRecordRepositoryTrait};

// Re-export test doubles for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use health_record::tests;

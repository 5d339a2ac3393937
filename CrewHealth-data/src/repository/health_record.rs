use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;
use async_trait::async_trait;

use crate::models::health_record::{
    CreateHealthRecordRequest, HealthRecord, HealthRecordFilter, UpdateHealthRecordRequest,
};
use crate::database::{get_db_pool, DatabaseError, DatabasePool};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for crew health records
#[async_trait]
pub trait HealthRecordRepositoryTrait {
    /// Create a new health record from a request
    async fn create(&self, request: CreateHealthRecordRequest) -> Result<HealthRecord, RepositoryError>;

    /// Get a health record by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<HealthRecord>, RepositoryError>;

    /// Apply a partial update; `None` when the record does not exist
    async fn update(&self, id: Uuid, update: UpdateHealthRecordRequest) -> Result<Option<HealthRecord>, RepositoryError>;

    /// Delete a record, reporting whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Get filtered health records with the total match count
    async fn get_filtered(&self, filter: HealthRecordFilter) -> Result<(Vec<HealthRecord>, usize), RepositoryError>;
}

/// Repository for health records.
/// Uses the SQLite pool when it is initialized and falls back to memory otherwise.
///
/// While a pool is available every write goes to the database and database
/// write errors are returned, so memory never holds rows the database lacks.
#[derive(Debug, Clone, Default)]
pub struct HealthRecordRepository {
    /// In-memory storage for when database is not available
    storage: InMemoryStorage,
    /// Pool used instead of the global one
    pool: Option<DatabasePool>,
}

impl HealthRecordRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
            pool: None,
        }
    }

    /// Repository bound to a specific pool rather than the global one
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self {
            storage: InMemoryStorage::new(),
            pool: Some(pool),
        }
    }

    fn database(&self) -> Result<DatabasePool, DatabaseError> {
        match &self.pool {
            Some(pool) => Ok(pool.clone()),
            None => get_db_pool(),
        }
    }
}

#[async_trait]
impl HealthRecordRepositoryTrait for HealthRecordRepository {
    async fn create(&self, request: CreateHealthRecordRequest) -> Result<HealthRecord, RepositoryError> {
        let now = Utc::now().to_rfc3339();

        let record = HealthRecord {
            id: Uuid::new_v4().to_string(),
            crew_id: request.crew_id,
            record_type: request.record_type,
            recorded_at: request.recorded_at,
            payload: request.payload,
            notes: request.notes,
            created_at: now.clone(),
            updated_at: now,
        };

        match self.database() {
            Ok(pool) => {
                debug!("Storing health record in database: {}", record.id);
                match DatabaseStorage::store_record(&pool, &record).await {
                    Ok(_) => Ok(record),
                    Err(e) => {
                        error!("Failed to store record in database: {}", e);
                        Err(e)
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store_record(&record).await
            }
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<HealthRecord>, RepositoryError> {
        let id = id.to_string();

        match self.database() {
            Ok(pool) => {
                debug!("Getting health record by ID from database: {}", id);
                match DatabaseStorage::get_by_id(&pool, &id).await {
                    Ok(Some(record)) => Ok(Some(record)),
                    Ok(None) => self.storage.get_by_id(&id).await,
                    Err(e) => {
                        error!("Failed to get record by ID from database: {}", e);
                        self.storage.get_by_id(&id).await
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_by_id", e);
                self.storage.get_by_id(&id).await
            }
        }
    }

    async fn update(&self, id: Uuid, update: UpdateHealthRecordRequest) -> Result<Option<HealthRecord>, RepositoryError> {
        let id = id.to_string();
        let now = Utc::now().to_rfc3339();

        match self.database() {
            Ok(pool) => {
                debug!("Updating health record in database: {}", id);
                match DatabaseStorage::get_by_id(&pool, &id).await {
                    Ok(Some(mut record)) => {
                        record.apply_update(update, now);
                        DatabaseStorage::store_record(&pool, &record).await?;
                        Ok(Some(record))
                    },
                    Ok(None) => self.storage.update_record(&id, update, now).await,
                    Err(e) => {
                        error!("Failed to load record for update from database: {}", e);
                        Err(e)
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for update", e);
                self.storage.update_record(&id, update, now).await
            }
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let id = id.to_string();

        match self.database() {
            Ok(pool) => {
                debug!("Deleting health record from database: {}", id);
                let removed_from_db = DatabaseStorage::delete_record(&pool, &id)
                    .await
                    .map_err(|e| {
                        error!("Failed to delete record from database: {}", e);
                        e
                    })?;
                let removed_from_memory = self.storage.delete_record(&id).await?;
                Ok(removed_from_db || removed_from_memory)
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for delete", e);
                self.storage.delete_record(&id).await
            }
        }
    }

    async fn get_filtered(&self, filter: HealthRecordFilter) -> Result<(Vec<HealthRecord>, usize), RepositoryError> {
        match self.database() {
            Ok(pool) => {
                debug!("Getting filtered health records from database");
                match DatabaseStorage::get_filtered(&pool, &filter).await {
                    Ok(result) => Ok(result),
                    Err(e) => {
                        error!("Failed to get filtered records from database: {}", e);
                        self.storage.get_filtered(&filter).await
                    }
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_filtered", e);
                self.storage.get_filtered(&filter).await
            }
        }
    }
}

/// Mock health record repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Vector-backed repository that never touches the global pool
    #[derive(Default)]
    pub struct MockHealthRecordRepository {
        records: Mutex<Vec<HealthRecord>>,
    }

    impl MockHealthRecordRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined records
        pub fn with_records(records: Vec<HealthRecord>) -> Self {
            Self { records: Mutex::new(records) }
        }
    }

    #[async_trait]
    impl HealthRecordRepositoryTrait for MockHealthRecordRepository {
        async fn create(&self, request: CreateHealthRecordRequest) -> Result<HealthRecord, RepositoryError> {
            let now = Utc::now().to_rfc3339();
            let record = HealthRecord {
                id: Uuid::new_v4().to_string(),
                crew_id: request.crew_id,
                record_type: request.record_type,
                recorded_at: request.recorded_at,
                payload: request.payload,
                notes: request.notes,
                created_at: now.clone(),
                updated_at: now,
            };
            self.records.lock()?.push(record.clone());
            Ok(record)
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<HealthRecord>, RepositoryError> {
            let records = self.records.lock()?;
            Ok(records.iter().find(|r| r.id == id.to_string()).cloned())
        }

        async fn update(&self, id: Uuid, update: UpdateHealthRecordRequest) -> Result<Option<HealthRecord>, RepositoryError> {
            let mut records = self.records.lock()?;
            Ok(records.iter_mut().find(|r| r.id == id.to_string()).map(|record| {
                record.apply_update(update, Utc::now().to_rfc3339());
                record.clone()
            }))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
            let mut records = self.records.lock()?;
            let before = records.len();
            records.retain(|r| r.id != id.to_string());
            Ok(records.len() != before)
        }

        async fn get_filtered(&self, filter: HealthRecordFilter) -> Result<(Vec<HealthRecord>, usize), RepositoryError> {
            let records = self.records.lock()?;
            let sort_desc = filter.sort_desc.unwrap_or(true);

            let mut filtered: Vec<HealthRecord> = records
                .iter()
                .filter(|record| filter.matches(record))
                .cloned()
                .collect();

            filtered.sort_by(|a, b| {
                let cmp = a.recorded_at.cmp(&b.recorded_at);
                if sort_desc { cmp.reverse() } else { cmp }
            });

            let total = filtered.len();
            let page = filtered
                .into_iter()
                .skip(filter.offset.unwrap_or(0))
                .take(filter.limit.unwrap_or(usize::MAX))
                .collect();

            Ok((page, total))
        }
    }

}

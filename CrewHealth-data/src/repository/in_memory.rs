use std::sync::{Arc, Mutex};
use std::collections::HashMap;

use crate::models::health_record::{HealthRecord, HealthRecordFilter, UpdateHealthRecordRequest};
use super::errors::RepositoryError;

/// In-memory storage implementation for health records
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    records: Arc<Mutex<HashMap<String, HealthRecord>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a record in memory
    pub async fn store_record(&self, record: &HealthRecord) -> Result<HealthRecord, RepositoryError> {
        let mut store = self.records.lock()?;
        store.insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    /// Get a record by ID from memory
    pub async fn get_by_id(&self, id: &str) -> Result<Option<HealthRecord>, RepositoryError> {
        let store = self.records.lock()?;
        Ok(store.get(id).cloned())
    }

    /// Apply an update to a stored record, returning the new version
    pub async fn update_record(
        &self,
        id: &str,
        update: UpdateHealthRecordRequest,
        updated_at: String,
    ) -> Result<Option<HealthRecord>, RepositoryError> {
        let mut store = self.records.lock()?;
        Ok(store.get_mut(id).map(|record| {
            record.apply_update(update, updated_at);
            record.clone()
        }))
    }

    /// Remove a record, reporting whether it existed
    pub async fn delete_record(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut store = self.records.lock()?;
        Ok(store.remove(id).is_some())
    }

    /// Get filtered records from memory
    pub async fn get_filtered(
        &self,
        filter: &HealthRecordFilter,
    ) -> Result<(Vec<HealthRecord>, usize), RepositoryError> {
        let store = self.records.lock()?;
        let sort_desc = filter.sort_desc.unwrap_or(true);

        let mut records: Vec<HealthRecord> = store
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();

        records.sort_by(|a, b| {
            let cmp = a.recorded_at.cmp(&b.recorded_at);
            if sort_desc {
                cmp.reverse()
            } else {
                cmp
            }
        });

        let total = records.len();
        let offset = filter.offset.unwrap_or(0);
        let limit = filter.limit.unwrap_or(total);

        let page = records
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect();

        Ok((page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, record_type: &str, recorded_at: &str) -> HealthRecord {
        HealthRecord {
            id: id.to_string(),
            crew_id: "crew-1".to_string(),
            record_type: record_type.to_string(),
            recorded_at: recorded_at.to_string(),
            payload: json!({}),
            notes: None,
            created_at: recorded_at.to_string(),
            updated_at: recorded_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_filtered_listing_sorts_and_paginates() {
        let storage = InMemoryStorage::new();
        storage.store_record(&record("a", "health_check", "2024-01-01T08:00:00+00:00")).await.unwrap();
        storage.store_record(&record("b", "health_check", "2024-01-02T08:00:00+00:00")).await.unwrap();
        storage.store_record(&record("c", "vaccination", "2024-01-03T08:00:00+00:00")).await.unwrap();
        storage.store_record(&record("d", "health_check", "2024-01-04T08:00:00+00:00")).await.unwrap();

        let filter = HealthRecordFilter {
            record_type: Some("health_check".to_string()),
            limit: Some(2),
            ..Default::default()
        };
        let (page, total) = storage.get_filtered(&filter).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["d", "b"]);

        let filter = HealthRecordFilter {
            record_type: Some("health_check".to_string()),
            offset: Some(2),
            sort_desc: Some(false),
            ..Default::default()
        };
        let (page, _) = storage.get_filtered(&filter).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "d");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let storage = InMemoryStorage::new();
        storage.store_record(&record("a", "examination", "2024-01-01T08:00:00+00:00")).await.unwrap();

        let updated = storage
            .update_record(
                "a",
                UpdateHealthRecordRequest { notes: Some("follow up".to_string()), ..Default::default() },
                "2024-01-05T08:00:00+00:00".to_string(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("follow up"));

        assert!(storage.update_record("missing", UpdateHealthRecordRequest::default(), String::new()).await.unwrap().is_none());
        assert!(storage.delete_record("a").await.unwrap());
        assert!(!storage.delete_record("a").await.unwrap());
        assert!(storage.get_by_id("a").await.unwrap().is_none());
    }
}

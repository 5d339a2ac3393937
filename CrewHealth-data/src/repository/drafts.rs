//! Per-crew draft snapshots.
//!
//! A draft is an unsubmitted copy of form state, keyed by crew identifier.
//! Every `put` replaces the previous snapshot for the key (last write wins).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::{get_db_pool, DatabasePool};
use super::errors::RepositoryError;

/// A stored draft snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDraft {
    /// Serialized form state
    pub value: serde_json::Value,

    /// When the snapshot was written (RFC 3339)
    pub saved_at: String,
}

/// Keyed snapshot store injected into form controllers
pub trait DraftStore: Send + Sync {
    /// Load the snapshot for a key, if any
    fn get(&self, key: &str) -> Result<Option<StoredDraft>, RepositoryError>;

    /// Replace the snapshot for a key
    fn put(&self, key: &str, value: serde_json::Value) -> Result<StoredDraft, RepositoryError>;

    /// Drop the snapshot for a key, reporting whether one existed
    fn remove(&self, key: &str) -> Result<bool, RepositoryError>;
}

fn stamp(value: serde_json::Value) -> StoredDraft {
    StoredDraft {
        value,
        saved_at: Utc::now().to_rfc3339(),
    }
}

/// Process-local draft store
#[derive(Debug, Clone, Default)]
pub struct InMemoryDraftStore {
    drafts: Arc<Mutex<HashMap<String, StoredDraft>>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for InMemoryDraftStore {
    fn get(&self, key: &str) -> Result<Option<StoredDraft>, RepositoryError> {
        let drafts = self.drafts.lock()?;
        Ok(drafts.get(key).cloned())
    }

    fn put(&self, key: &str, value: serde_json::Value) -> Result<StoredDraft, RepositoryError> {
        let draft = stamp(value);
        let mut drafts = self.drafts.lock()?;
        drafts.insert(key.to_string(), draft.clone());
        Ok(draft)
    }

    fn remove(&self, key: &str) -> Result<bool, RepositoryError> {
        let mut drafts = self.drafts.lock()?;
        Ok(drafts.remove(key).is_some())
    }
}

/// SQLite-backed draft store
#[derive(Debug, Clone)]
pub struct DatabaseDraftStore {
    pool: DatabasePool,
}

impl DatabaseDraftStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl DraftStore for DatabaseDraftStore {
    fn get(&self, key: &str) -> Result<Option<StoredDraft>, RepositoryError> {
        debug!("Loading draft from database: {}", key);

        let DatabasePool::SQLite(pool) = &self.pool;
        let conn = pool.get()?;

        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT body, saved_at FROM drafts WHERE draft_key = ?1",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((body, saved_at)) => Ok(Some(StoredDraft {
                value: serde_json::from_str(&body)?,
                saved_at,
            })),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: serde_json::Value) -> Result<StoredDraft, RepositoryError> {
        debug!("Saving draft to database: {}", key);

        let draft = stamp(value);
        let body = serde_json::to_string(&draft.value)?;

        let DatabasePool::SQLite(pool) = &self.pool;
        let conn = pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO drafts (draft_key, body, saved_at) VALUES (?1, ?2, ?3)",
            params![key, body, &draft.saved_at],
        )?;

        Ok(draft)
    }

    fn remove(&self, key: &str) -> Result<bool, RepositoryError> {
        debug!("Removing draft from database: {}", key);

        let DatabasePool::SQLite(pool) = &self.pool;
        let conn = pool.get()?;
        let removed = conn.execute("DELETE FROM drafts WHERE draft_key = ?1", [key])?;
        Ok(removed > 0)
    }
}

/// Draft store backed by the global pool, or memory when no pool is initialized
pub fn create_default_draft_store() -> Arc<dyn DraftStore> {
    match get_db_pool() {
        Ok(pool) => Arc::new(DatabaseDraftStore::new(pool)),
        Err(e) => {
            debug!("Database not available ({}), using in-memory draft store", e);
            Arc::new(InMemoryDraftStore::new())
        }
    }
}

use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::debug;

use crate::models::health_record::{HealthRecord, HealthRecordFilter};
use crate::database::DatabasePool;
use super::errors::RepositoryError;

const RECORD_COLUMNS: &str =
    "id, crew_id, record_type, recorded_at, payload, notes, created_at, updated_at";

/// Database storage operations for health records
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Insert or replace a record in the database
    pub async fn store_record(pool: &DatabasePool, record: &HealthRecord) -> Result<(), RepositoryError> {
        debug!("Storing health record in database: id={}", record.id);

        let DatabasePool::SQLite(pool) = pool;
        let conn = pool.get()?;
        let payload = serde_json::to_string(&record.payload)?;

        conn.execute(
            "INSERT OR REPLACE INTO health_records
             (id, crew_id, record_type, recorded_at, payload, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &record.id,
                &record.crew_id,
                &record.record_type,
                &record.recorded_at,
                payload,
                &record.notes,
                &record.created_at,
                &record.updated_at,
            ],
        )?;

        Ok(())
    }

    /// Get a record by ID from the database
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> Result<Option<HealthRecord>, RepositoryError> {
        debug!("Getting health record by ID from database: {}", id);

        let DatabasePool::SQLite(pool) = pool;
        let conn = pool.get()?;

        let raw = conn
            .query_row(
                &format!("SELECT {} FROM health_records WHERE id = ?1", RECORD_COLUMNS),
                [id],
                read_raw_record,
            )
            .optional()?;

        raw.map(RawRecord::into_record).transpose()
    }

    /// Delete a record, reporting whether a row was removed
    pub async fn delete_record(pool: &DatabasePool, id: &str) -> Result<bool, RepositoryError> {
        debug!("Deleting health record from database: {}", id);

        let DatabasePool::SQLite(pool) = pool;
        let conn = pool.get()?;
        let removed = conn.execute("DELETE FROM health_records WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    /// Get filtered records from the database
    pub async fn get_filtered(
        pool: &DatabasePool,
        filter: &HealthRecordFilter,
    ) -> Result<(Vec<HealthRecord>, usize), RepositoryError> {
        debug!("Getting filtered health records from database: {:?}", filter);

        let DatabasePool::SQLite(pool) = pool;
        let conn = pool.get()?;

        let mut clauses = Vec::new();
        let mut values: Vec<&str> = Vec::new();

        if let Some(crew_id) = filter.crew_id.as_deref() {
            values.push(crew_id);
            clauses.push(format!("crew_id = ?{}", values.len()));
        }
        if let Some(record_type) = filter.record_type.as_deref() {
            values.push(record_type);
            clauses.push(format!("record_type = ?{}", values.len()));
        }
        if let Some(start_date) = filter.start_date.as_deref() {
            values.push(start_date);
            clauses.push(format!("recorded_at >= ?{}", values.len()));
        }
        if let Some(end_date) = filter.end_date.as_deref() {
            values.push(end_date);
            clauses.push(format!("recorded_at <= ?{}", values.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM health_records{}", where_clause),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let direction = if filter.sort_desc.unwrap_or(true) { "DESC" } else { "ASC" };
        // SQLite treats a negative LIMIT as "no limit".
        let limit = filter.limit.map(|l| l as i64).unwrap_or(-1);
        let offset = filter.offset.unwrap_or(0) as i64;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM health_records{} ORDER BY recorded_at {} LIMIT {} OFFSET {}",
            RECORD_COLUMNS, where_clause, direction, limit, offset
        ))?;

        let rows = stmt.query_map(params_from_iter(values.iter()), read_raw_record)?;

        let mut records = Vec::new();
        for raw in rows {
            records.push(raw?.into_record()?);
        }

        Ok((records, total as usize))
    }
}

/// Row as stored, with the payload still serialized
struct RawRecord {
    id: String,
    crew_id: String,
    record_type: String,
    recorded_at: String,
    payload: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl RawRecord {
    fn into_record(self) -> Result<HealthRecord, RepositoryError> {
        Ok(HealthRecord {
            id: self.id,
            crew_id: self.crew_id,
            record_type: self.record_type,
            recorded_at: self.recorded_at,
            payload: serde_json::from_str(&self.payload)?,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn read_raw_record(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        id: row.get(0)?,
        crew_id: row.get(1)?,
        record_type: row.get(2)?,
        recorded_at: row.get(3)?,
        payload: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_pool, DatabaseConfig};
    use serde_json::json;

    fn memory_pool() -> DatabasePool {
        create_pool(&DatabaseConfig { sqlite_path: None, ..DatabaseConfig::default() }).unwrap()
    }

    fn record(id: &str, crew_id: &str, record_type: &str, recorded_at: &str) -> HealthRecord {
        HealthRecord {
            id: id.to_string(),
            crew_id: crew_id.to_string(),
            record_type: record_type.to_string(),
            recorded_at: recorded_at.to_string(),
            payload: json!({ "risk_tier": "Low" }),
            notes: None,
            created_at: recorded_at.to_string(),
            updated_at: recorded_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_round_trips_payload() {
        let pool = memory_pool();
        let rec = record("r1", "crew-1", "health_check", "2024-02-01T08:00:00+00:00");
        DatabaseStorage::store_record(&pool, &rec).await.unwrap();

        let loaded = DatabaseStorage::get_by_id(&pool, "r1").await.unwrap().unwrap();
        assert_eq!(loaded, rec);
        assert!(DatabaseStorage::get_by_id(&pool, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filtered_query() {
        let pool = memory_pool();
        for (id, crew, kind, at) in [
            ("r1", "crew-1", "health_check", "2024-02-01T08:00:00+00:00"),
            ("r2", "crew-1", "health_check", "2024-02-03T08:00:00+00:00"),
            ("r3", "crew-2", "health_check", "2024-02-02T08:00:00+00:00"),
            ("r4", "crew-1", "vaccination", "2024-02-04T08:00:00+00:00"),
        ] {
            DatabaseStorage::store_record(&pool, &record(id, crew, kind, at)).await.unwrap();
        }

        let filter = HealthRecordFilter {
            crew_id: Some("crew-1".to_string()),
            record_type: Some("health_check".to_string()),
            ..Default::default()
        };
        let (records, total) = DatabaseStorage::get_filtered(&pool, &filter).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(records[0].id, "r2");
        assert_eq!(records[1].id, "r1");

        let filter = HealthRecordFilter {
            start_date: Some("2024-02-02T00:00:00+00:00".to_string()),
            sort_desc: Some(false),
            limit: Some(2),
            ..Default::default()
        };
        let (records, total) = DatabaseStorage::get_filtered(&pool, &filter).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["r3", "r2"]);

        assert!(DatabaseStorage::delete_record(&pool, "r4").await.unwrap());
        assert!(!DatabaseStorage::delete_record(&pool, "r4").await.unwrap());
    }
}

use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_health_records_table(conn)?;
    create_health_records_indexes(conn)?;
    create_drafts_table(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the health records table
fn create_health_records_table(conn: &Connection) -> Result<(), String> {
    info!("Creating health_records table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS health_records (
            id TEXT PRIMARY KEY,
            crew_id TEXT NOT NULL,
            record_type TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            payload TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create indexes used by filtered listing
fn create_health_records_indexes(conn: &Connection) -> Result<(), String> {
    info!("Creating health_records indexes");

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_health_records_recorded_at
            ON health_records (recorded_at DESC);
         CREATE INDEX IF NOT EXISTS idx_health_records_crew_type
            ON health_records (crew_id, record_type);"
    ).map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}

/// Create the per-crew draft snapshot table
fn create_drafts_table(conn: &Connection) -> Result<(), String> {
    info!("Creating drafts table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS drafts (
            draft_key TEXT PRIMARY KEY,
            body TEXT NOT NULL,
            saved_at TEXT NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

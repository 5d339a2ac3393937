//! Database connection module for the CrewHealth application
//!
//! The record and draft stores share one SQLite connection pool. When the
//! pool cannot be created for the configured file, an in-memory SQLite
//! database is used instead so the service still starts.

use std::env;
use std::sync::Arc;
use thiserror::Error;
use once_cell::sync::OnceCell;
use tracing::{info, error, warn};

use super::migrations::run_sqlite_migrations;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// SQLite database (file-based)
    Sqlite,
}

impl DatabaseType {
    /// Convert from string to database type
    pub fn parse(s: &str) -> Result<Self, DatabaseError> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseType::Sqlite),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Database connection pool
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    SQLite(Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>),
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Database pool already initialized
    #[error("Database pool is already initialized")]
    PoolAlreadyInitialized,

    /// Database pool not initialized
    #[error("Database pool is not initialized")]
    PoolNotInitialized,

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database type
    pub db_type: DatabaseType,
    /// Path to SQLite database file; `None` selects an in-memory database
    pub sqlite_path: Option<String>,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            sqlite_path: Some("./data/crew_health.db".to_string()),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let db_type_str = env::var("DB_TYPE").unwrap_or_else(|_| "sqlite".to_string());
        let db_type = DatabaseType::parse(&db_type_str)?;

        let sqlite_path = env::var("DB_SQLITE_PATH").ok();
        match sqlite_path {
            Some(ref path) => info!("Using SQLite database at: {}", path),
            None => info!("No DB_SQLITE_PATH provided, will use default path: data/crew_health.db"),
        }

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        info!("Database configuration: max_connections={}, timeout={}s",
            max_connections, timeout_seconds);

        Ok(DatabaseConfig {
            db_type,
            sqlite_path: sqlite_path.or_else(|| Some("data/crew_health.db".to_string())),
            max_connections,
            timeout_seconds,
        })
    }
}

/// Initialize the global database connection pool from the environment
pub fn initialize_database_pool() -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let config = DatabaseConfig::from_env()?;
    let pool = create_pool(&config)?;

    DB_POOL.set(pool).map_err(|_| DatabaseError::PoolAlreadyInitialized)
}

/// Get the database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get()
        .cloned()
        .ok_or(DatabaseError::PoolNotInitialized)
}

/// Build a migrated pool for the given configuration without touching the global pool
pub fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing database pool with type: {:?}", config.db_type);

    let pool = match config.db_type {
        DatabaseType::Sqlite => match config.sqlite_path {
            Some(ref path) => initialize_sqlite_pool(path, config)?,
            None => initialize_in_memory_sqlite_pool(config)?,
        },
    };

    run_migrations(&pool)?;
    Ok(pool)
}

/// Initialize SQLite connection pool
fn initialize_sqlite_pool(sqlite_path: &str, config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;

    info!("Initializing SQLite database at: {}", sqlite_path);

    if let Some(parent) = Path::new(sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create directory: {}, falling back to in-memory database", e);
                return initialize_in_memory_sqlite_pool(config);
            }
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    match r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager) {
            Ok(pool) => {
                info!("SQLite connection pool created successfully");
                Ok(DatabasePool::SQLite(Arc::new(pool)))
            },
            Err(e) => {
                error!("Failed to create SQLite connection pool: {}", e);
                warn!("Falling back to in-memory SQLite database");
                initialize_in_memory_sqlite_pool(config)
            }
        }
}

/// Initialize an in-memory SQLite database as fallback
fn initialize_in_memory_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    // Every in-memory connection is its own database, so the pool holds exactly one.
    let manager = r2d2_sqlite::SqliteConnectionManager::memory();
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    info!("In-memory SQLite database initialized successfully");
    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

/// Run database migrations
fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!("Running database migrations");

    match pool {
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            run_sqlite_migrations(&conn).map_err(DatabaseError::MigrationError)?;
        },
    }

    info!("Database migrations completed successfully");
    Ok(())
}

/// Get information about the current database connection
pub fn get_connection_info() -> Option<String> {
    let pool = DB_POOL.get()?;

    match pool {
        DatabasePool::SQLite(pool) => match pool.get() {
            Ok(conn) => {
                let location = match conn.query_row(
                    "PRAGMA database_list",
                    [],
                    |row| row.get::<_, String>(2),
                ) {
                    Ok(path) if path.is_empty() || path == ":memory:" => "SQLite in-memory database".to_string(),
                    Ok(path) => format!("SQLite database at {}", path),
                    Err(_) => "SQLite database (path unknown)".to_string(),
                };

                let state = pool.state();
                Some(format!("{} healthy (connections: active={}, idle={})",
                    location,
                    state.connections,
                    state.idle_connections
                ))
            },
            Err(e) => {
                error!("Failed to get SQLite connection: {}", e);
                Some(format!("SQLite connection error: {}", e))
            }
        },
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading server configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("DRAFT_STORE must be 'database' or 'memory', got {0:?}")]
    InvalidDraftStore(String),
}

/// Where form drafts are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStoreKind {
    /// SQLite when the pool is up, memory otherwise
    Database,
    Memory,
}

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub draft_store: DraftStoreKind,
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("data"),
            draft_store: DraftStoreKind::Database,
            environment: "development".to_string(),
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `DATA_DIR`, `DRAFT_STORE` and `APP_ENV`, defaulting unset values
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => defaults.port,
        };

        let draft_store = match lookup("DRAFT_STORE") {
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "database" | "sqlite" => DraftStoreKind::Database,
                "memory" => DraftStoreKind::Memory,
                _ => return Err(ConfigError::InvalidDraftStore(raw)),
            },
            None => defaults.draft_store,
        };

        Ok(Self {
            port,
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            draft_store,
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
        })
    }

    /// Default SQLite file inside the data directory
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("crew_health.db")
    }
}

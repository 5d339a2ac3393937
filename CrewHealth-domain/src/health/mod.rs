//! System health reporting for the service.
//!
//! The database is the only external component. When its pool is missing the
//! record and draft stores fall back to memory, so the system is reported as
//! degraded rather than down.

use std::collections::HashMap;

use async_trait::async_trait;
use crew_health_data::database;
use tracing::debug;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Status of one component with optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Component name to status
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Overall status is the worst component status
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        Self { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the database.
    /// `Ok(false)` means reachable but degraded; `Err` means unavailable.
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Check if the database pool is available and reports healthy
pub async fn check_database_status() -> Result<bool, String> {
    match database::get_connection_info() {
        Some(info) => Ok(info.contains("healthy")),
        None => match database::get_db_pool() {
            Ok(_) => Ok(true),
            Err(e) => Err(format!("Database connection error: {}", e)),
        },
    }
}

/// Health service backed by the global database pool
#[derive(Debug, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let database = match self.check_database_status().await {
            Ok(true) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
            Ok(false) => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Database is available but reports problems".to_string()),
            },
            Err(e) => {
                debug!("Database unavailable for health check: {}", e);
                HealthComponent {
                    status: ComponentStatus::Degraded,
                    details: Some(format!("{}; records are kept in memory", e)),
                }
            }
        };

        let mut components = HashMap::new();
        components.insert("database".to_string(), database);
        components.insert(
            "api".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
        );

        SystemHealth::from_components(components)
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        check_database_status().await
    }
}

/// Factory function to create the default health service
pub fn create_default_health_service() -> HealthService {
    HealthService::new()
}

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crew_health_domain::health::{
    create_default_health_service, ComponentStatus as DomainComponentStatus, HealthServiceTrait,
    SystemStatus,
};

/// Shared health service handle
pub type HealthServiceHandle = Arc<dyn HealthServiceTrait + Send + Sync>;

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// "ok", "degraded" or "error"
    pub status: String,
    /// Application version from the Cargo manifest
    pub version: String,
    /// Unix time the response was generated
    pub timestamp: u64,
    /// Seconds since the server started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    pub components: ComponentStatus,
    pub environment: String,
}

/// Status of individual system components
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    pub database: ComponentHealthStatus,
    pub api: ComponentHealthStatus,
    /// Any further components reported by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<serde_json::Value>,
}

/// Health status for an individual component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Record the server start time for uptime reporting; later calls are no-ops
pub fn initialize_server_start_time() {
    let _ = SERVER_START_TIME.set(unix_now());
}

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 500, description = "API is not healthy", body = HealthResponse),
        (status = 503, description = "API is degraded", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(health_service))]
pub async fn health_check(Extension(health_service): Extension<HealthServiceHandle>) -> impl IntoResponse {
    info!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME.get().map(|&start| now.saturating_sub(start));

    let system_health = health_service.get_system_health().await;

    let overall_status = match system_health.status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Degraded => "degraded",
        SystemStatus::Unhealthy => "error",
    };

    let component = |name: &str| {
        let found = system_health.components.get(name);
        ComponentHealthStatus {
            status: map_component_status(
                found.map(|c| &c.status).unwrap_or(&DomainComponentStatus::Healthy),
            ),
            message: found.and_then(|c| c.details.clone()),
        }
    };

    let additional: serde_json::Map<String, serde_json::Value> = system_health
        .components
        .iter()
        .filter(|(name, _)| name.as_str() != "database" && name.as_str() != "api")
        .map(|(name, c)| {
            (
                name.clone(),
                serde_json::json!({
                    "status": map_component_status(&c.status),
                    "message": c.details,
                }),
            )
        })
        .collect();

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: ComponentStatus {
            database: component("database"),
            api: component("api"),
            additional: if additional.is_empty() { None } else { Some(additional.into()) },
        },
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    };

    let status = match system_health.status {
        SystemStatus::Healthy => StatusCode::OK,
        SystemStatus::Degraded => StatusCode::SERVICE_UNAVAILABLE,
        SystemStatus::Unhealthy => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(response))
}

fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
    .to_string()
}

/// Factory function to create the health service
pub fn create_health_service() -> HealthServiceHandle {
    Arc::new(create_default_health_service())
}

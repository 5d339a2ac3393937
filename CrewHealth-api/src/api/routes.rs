use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::debug;

use crate::api::handlers::{drafts, health, records, vitals};
use crate::api::state::AppState;
use crate::config::AppConfig;
use crate::openapi::configure_swagger_routes;

/// Create the application router with default services
pub async fn create_app(config: &AppConfig) -> Router {
    debug!("Creating application router");

    let state = AppState::from_config(config);
    let health_service = health::create_health_service();

    health::initialize_server_start_time();

    build_router(state, health_service)
}

/// Assemble routes, docs and middleware around the given services
pub fn build_router(state: AppState, health_service: health::HealthServiceHandle) -> Router {
    // Specific routes before parametrized ones
    let api_routes = Router::new()
        .route("/vitals/assess", post(vitals::assess_vitals))
        .route("/vitals/convert-temperature", post(vitals::convert_temperature))
        .route("/health-checks", post(records::submit_health_check))
        .route("/records", get(records::list_records).post(records::create_record))
        .route(
            "/records/:id",
            get(records::get_record)
                .put(records::update_record)
                .delete(records::delete_record),
        )
        .route(
            "/drafts/:crew_id",
            get(drafts::get_draft)
                .put(drafts::save_draft)
                .delete(drafts::delete_draft),
        );

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(state)
        .merge(configure_swagger_routes());

    debug!("Swagger UI merged");

    configure_middleware(app)
}

/// CORS, request tracing and security headers
pub fn configure_middleware(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    app.layer(cors)
        .layer(security_headers)
        .layer(TraceLayer::new_for_http())
}

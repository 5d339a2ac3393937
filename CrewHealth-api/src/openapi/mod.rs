use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Vitals endpoints
        crate::api::handlers::vitals::assess_vitals,
        crate::api::handlers::vitals::convert_temperature,

        // Record endpoints
        crate::api::handlers::records::submit_health_check,
        crate::api::handlers::records::create_record,
        crate::api::handlers::records::list_records,
        crate::api::handlers::records::get_record,
        crate::api::handlers::records::update_record,
        crate::api::handlers::records::delete_record,

        // Draft endpoints
        crate::api::handlers::drafts::get_draft,
        crate::api::handlers::drafts::save_draft,
        crate::api::handlers::drafts::delete_draft
    ),
    components(
        schemas(
            // Common
            crate::entities::common::ErrorResponse,
            crate::entities::common::HealthRecordPage,

            // Vitals
            crate::entities::vitals::VitalValue,
            crate::entities::vitals::RawVitals,
            crate::entities::vitals::AssessVitalsRequest,
            crate::entities::vitals::AssessmentResponse,
            crate::entities::vitals::ConvertTemperatureRequest,
            crate::entities::vitals::ConvertTemperatureResponse,
            crate::entities::vitals::HealthCheckRequest,

            // Records
            crate::entities::records::HealthRecordResponse,
            crate::entities::records::CreateRecordRequest,
            crate::entities::records::UpdateRecordRequest,
            crate::entities::records::RecordQueryParams,

            // Drafts
            crate::entities::drafts::SaveDraftRequest,
            crate::entities::drafts::DraftResponse,

            // Domain types
            crew_health_domain::entities::TemperatureUnit,
            crew_health_domain::entities::VitalsForm,
            crew_health_domain::entities::VitalsReading,
            crew_health_domain::entities::AssessmentSummary,
            crew_health_domain::entities::BloodPressureCategory,
            crew_health_domain::entities::RiskTier,
            crew_health_domain::entities::Symptom,
            crew_health_domain::entities::RecordType,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "vitals", description = "Vitals validation, temperature conversion and risk assessment"),
        (name = "records", description = "Crew health record management"),
        (name = "drafts", description = "Unsubmitted health-check form drafts")
    ),
    info(
        title = "CrewHealth API",
        version = "0.1.0",
        description = "Daily crew health checks with vitals assessment, health records and drafts",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::{debug, info, instrument};

use crew_health_domain::services::vitals;

use crate::entities::vitals::{
    AssessVitalsRequest, AssessmentResponse, ConvertTemperatureRequest, ConvertTemperatureResponse,
};

/// Validate a raw reading and compute its blood pressure category and risk tier
#[utoipa::path(
    post,
    path = "/api/v1/vitals/assess",
    request_body = AssessVitalsRequest,
    responses(
        (status = 200, description = "Reading assessed; check `valid` for field errors", body = AssessmentResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(request))]
pub async fn assess_vitals(Json(request): Json<AssessVitalsRequest>) -> impl IntoResponse {
    let form = request.vitals.into_form();

    let validation = vitals::validate(&form, request.unit);
    let reading = form.reading(request.unit);
    let summary = vitals::assess(&reading);

    debug!("Assessed reading: valid={}, risk={}", validation.is_valid(), summary.risk_tier);

    let response = AssessmentResponse {
        valid: validation.is_valid(),
        errors: validation.into_map(),
        reading,
        summary,
    };

    (StatusCode::OK, Json(response))
}

/// Convert a temperature between Celsius and Fahrenheit
#[utoipa::path(
    post,
    path = "/api/v1/vitals/convert-temperature",
    request_body = ConvertTemperatureRequest,
    responses(
        (status = 200, description = "Converted temperature", body = ConvertTemperatureResponse),
    ),
    tag = "vitals"
)]
#[instrument]
pub async fn convert_temperature(Json(request): Json<ConvertTemperatureRequest>) -> impl IntoResponse {
    info!("Converting {} {} to {}", request.value, request.from, request.to);

    let value = vitals::convert_temperature(request.value, request.from, request.to);

    (
        StatusCode::OK,
        Json(ConvertTemperatureResponse {
            value,
            unit: request.to,
        }),
    )
}

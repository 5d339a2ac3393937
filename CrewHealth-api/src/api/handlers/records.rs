use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};

use crew_health_domain::entities::RecordFilter;
use crew_health_domain::services::{HealthCheckSubmission, HealthRecordServiceError};

use crate::api::handlers::drafts::with_drafts;
use crate::api::state::AppState;
use crate::entities::common::{ErrorResponse, HealthRecordPage, PaginatedResponse};
use crate::entities::records::{
    CreateRecordRequest, HealthRecordResponse, RecordQueryParams, UpdateRecordRequest,
};
use crate::entities::vitals::HealthCheckRequest;

const RECORDS_PATH: &str = "/api/v1/records";

impl From<HealthRecordServiceError> for ErrorResponse {
    fn from(err: HealthRecordServiceError) -> Self {
        match err {
            HealthRecordServiceError::ValidationError(message) => {
                warn!("Rejected record request: {}", message);
                ErrorResponse::validation_error(&message, None)
            }
            HealthRecordServiceError::InvalidVitals(validation) => {
                warn!("Rejected vitals: {}", validation);
                let details = serde_json::to_value(validation.into_map()).unwrap_or_default();
                ErrorResponse::invalid_vitals(details)
            }
            HealthRecordServiceError::NotFound(message) => {
                info!("{}", message);
                ErrorResponse::not_found("health record")
            }
            HealthRecordServiceError::RepositoryError(message) => {
                error!("Health record storage failed: {}", message);
                ErrorResponse::internal_error()
            }
        }
    }
}

fn error_response(err: HealthRecordServiceError) -> Response {
    ErrorResponse::from(err).into_response()
}

/// Submit a daily health check; rejected with 422 when any vital is invalid
#[utoipa::path(
    post,
    path = "/api/v1/health-checks",
    request_body = HealthCheckRequest,
    responses(
        (status = 201, description = "Health check stored with its assessment", body = HealthRecordResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "Vitals failed validation; details holds the field messages", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state, request))]
pub async fn submit_health_check(
    State(state): State<AppState>,
    Json(request): Json<HealthCheckRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Submitting health check for {}", request.crew_id);

    let submission = HealthCheckSubmission {
        crew_id: request.crew_id.clone(),
        form: request.form(),
        unit: request.unit,
        recorded_at: request.recorded_at.clone(),
    };

    let record = state
        .records
        .submit_health_check(submission)
        .await
        .map_err(error_response)?;

    // A submitted check supersedes whatever draft was saved.
    let crew_id = record.crew_id.clone();
    if with_drafts(&state.drafts, move |drafts| drafts.remove(&crew_id)).await.is_err() {
        warn!("Could not clear draft after submission");
    }

    Ok((StatusCode::CREATED, Json(HealthRecordResponse::from(record))))
}

/// Create a health record of any type
#[utoipa::path(
    post,
    path = "/api/v1/records",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Record created", body = HealthRecordResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "Health-check payload failed validation", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state, request))]
pub async fn create_record(
    State(state): State<AppState>,
    Json(request): Json<CreateRecordRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Creating {} record", request.record_type);

    let record = state
        .records
        .create_record(request.into_domain())
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(HealthRecordResponse::from(record))))
}

/// Get a single record by ID
#[utoipa::path(
    get,
    path = "/api/v1/records/{id}",
    params(
        ("id" = String, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record found", body = HealthRecordResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    let record = state.records.get_record(&id).await.map_err(error_response)?;
    Ok((StatusCode::OK, Json(HealthRecordResponse::from(record))))
}

/// Update notes, time or payload of a record
#[utoipa::path(
    put,
    path = "/api/v1/records/{id}",
    params(
        ("id" = String, Path, description = "Record ID")
    ),
    request_body = UpdateRecordRequest,
    responses(
        (status = 200, description = "Record updated", body = HealthRecordResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 422, description = "Health-check payload failed validation", body = ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state, request))]
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRecordRequest>,
) -> Result<impl IntoResponse, Response> {
    let record = state
        .records
        .update_record(&id, request.into_domain())
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(HealthRecordResponse::from(record))))
}

/// Delete a record
#[utoipa::path(
    delete,
    path = "/api/v1/records/{id}",
    params(
        ("id" = String, Path, description = "Record ID")
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found", body = ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    state.records.delete_record(&id).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List records, filtered and paginated
#[utoipa::path(
    get,
    path = "/api/v1/records",
    params(
        RecordQueryParams
    ),
    responses(
        (status = 200, description = "Records retrieved", body = HealthRecordPage),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<RecordQueryParams>,
) -> Result<impl IntoResponse, Response> {
    let limit = params.limit.unwrap_or(100).min(1000);
    let offset = params.offset.unwrap_or(0);

    let sort_desc = match params.sort.as_deref() {
        None | Some("desc") => true,
        Some("asc") => false,
        Some(other) => {
            let message = format!("Invalid sort '{}'. Use asc or desc", other);
            return Err(ErrorResponse::bad_request(&message).into_response());
        }
    };

    for (name, value) in [("start_date", &params.start_date), ("end_date", &params.end_date)] {
        if let Some(value) = value {
            if chrono::DateTime::parse_from_rfc3339(value).is_err() {
                let message = format!("Invalid {} format. Use RFC 3339 (e.g. 2024-03-15T08:30:00Z)", name);
                return Err(ErrorResponse::bad_request(&message).into_response());
            }
        }
    }

    let filter = RecordFilter {
        crew_id: params.crew_id.clone(),
        record_type: params.record_type.clone(),
        start_date: params.start_date.clone(),
        end_date: params.end_date.clone(),
        limit: Some(limit),
        offset: Some(offset),
        sort_desc: Some(sort_desc),
    };

    let (records, total_count) = state.records.list_records(filter).await.map_err(error_response)?;

    let next = (offset + limit < total_count)
        .then(|| format!("{}{}", RECORDS_PATH, params.page_query(limit, offset + limit)));
    let previous = (offset > 0)
        .then(|| format!("{}{}", RECORDS_PATH, params.page_query(limit, offset.saturating_sub(limit))));

    let response = PaginatedResponse {
        total_count,
        offset,
        limit,
        next,
        previous,
        data: records.into_iter().map(HealthRecordResponse::from).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

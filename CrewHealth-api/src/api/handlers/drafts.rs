use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};

use crew_health_domain::services::{DraftError, DraftService};

use crate::api::state::AppState;
use crate::entities::common::ErrorResponse;
use crate::entities::drafts::{DraftResponse, SaveDraftRequest};

impl From<DraftError> for ErrorResponse {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::NotFound(_) => ErrorResponse::not_found("draft"),
            DraftError::InvalidKey(message) => {
                warn!("Rejected draft key: {}", message);
                ErrorResponse::bad_request(&message)
            }
            DraftError::Encoding(e) => {
                error!("Stored draft could not be decoded: {}", e);
                ErrorResponse::internal_error()
            }
            DraftError::Store(e) => {
                error!("Draft storage failed: {}", e);
                ErrorResponse::internal_error()
            }
        }
    }
}

fn error_response(err: DraftError) -> Response {
    ErrorResponse::from(err).into_response()
}

/// Run a draft store call on the blocking pool; SQLite access is synchronous
pub(crate) async fn with_drafts<T, F>(drafts: &DraftService, call: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&DraftService) -> Result<T, DraftError> + Send + 'static,
{
    let drafts = drafts.clone();
    match tokio::task::spawn_blocking(move || call(&drafts)).await {
        Ok(result) => result.map_err(error_response),
        Err(e) => {
            error!("Draft task failed: {}", e);
            Err(ErrorResponse::internal_error().into_response())
        }
    }
}

/// Get the saved health-check draft for a crew member
#[utoipa::path(
    get,
    path = "/api/v1/drafts/{crew_id}",
    params(
        ("crew_id" = String, Path, description = "Crew member ID")
    ),
    responses(
        (status = 200, description = "Draft found", body = DraftResponse),
        (status = 404, description = "No draft saved", body = ErrorResponse),
    ),
    tag = "drafts"
)]
#[instrument(skip(state))]
pub async fn get_draft(
    State(state): State<AppState>,
    Path(crew_id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    let key = crew_id.clone();
    match with_drafts(&state.drafts, move |drafts| drafts.load(&key)).await? {
        Some(draft) => Ok((StatusCode::OK, Json(DraftResponse::new(&crew_id, draft)))),
        None => Err(error_response(DraftError::NotFound(crew_id))),
    }
}

/// Save the health-check draft for a crew member, replacing any previous one
#[utoipa::path(
    put,
    path = "/api/v1/drafts/{crew_id}",
    params(
        ("crew_id" = String, Path, description = "Crew member ID")
    ),
    request_body = SaveDraftRequest,
    responses(
        (status = 200, description = "Draft saved", body = DraftResponse),
        (status = 400, description = "Invalid crew ID", body = ErrorResponse),
    ),
    tag = "drafts"
)]
#[instrument(skip(state, request))]
pub async fn save_draft(
    State(state): State<AppState>,
    Path(crew_id): Path<String>,
    Json(request): Json<SaveDraftRequest>,
) -> Result<impl IntoResponse, Response> {
    let key = crew_id.clone();
    let draft = with_drafts(&state.drafts, move |drafts| {
        drafts.save(&key, &request.form, request.unit)
    })
    .await?;

    Ok((StatusCode::OK, Json(DraftResponse::new(&crew_id, draft))))
}

/// Discard the health-check draft for a crew member
#[utoipa::path(
    delete,
    path = "/api/v1/drafts/{crew_id}",
    params(
        ("crew_id" = String, Path, description = "Crew member ID")
    ),
    responses(
        (status = 204, description = "Draft removed"),
        (status = 404, description = "No draft saved", body = ErrorResponse),
    ),
    tag = "drafts"
)]
#[instrument(skip(state))]
pub async fn delete_draft(
    State(state): State<AppState>,
    Path(crew_id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    let key = crew_id.clone();
    if with_drafts(&state.drafts, move |drafts| drafts.remove(&key)).await? {
        info!("Draft discarded");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(error_response(DraftError::NotFound(crew_id)))
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::records::HealthRecordResponse;

/// Error response format for the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details, e.g. per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Vitals rejected by assessment; `details` maps error keys to messages
    pub fn invalid_vitals(details: serde_json::Value) -> Self {
        Self {
            error: "invalid_vitals".to_string(),
            message: "One or more vitals are missing or out of range".to_string(),
            details: Some(details),
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "invalid_vitals" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Paginated response format
#[derive(Debug, Serialize, ToSchema)]
#[aliases(HealthRecordPage = PaginatedResponse<HealthRecordResponse>)]
pub struct PaginatedResponse<T> {
    /// Total number of matching items
    pub total_count: usize,

    pub offset: usize,

    pub limit: usize,

    /// URL for the next page, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// URL for the previous page, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,

    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorResponse::not_found("record").status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorResponse::bad_request("nope").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorResponse::invalid_vitals(serde_json::json!({})).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ErrorResponse::internal_error().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let json = serde_json::to_value(ErrorResponse::not_found("draft")).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["error"], "not_found");
    }
}

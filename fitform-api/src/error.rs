//! API error mapping for fitform-api
//!
//! Wraps the common error taxonomy and maps it onto HTTP statuses and the
//! flat `{"error": "..."}` body shape. Validation and not-found messages
//! pass through verbatim; everything else is logged and surfaced opaquely.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use fitform_common::Error as CoreError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Measurement core error
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Core(err) = self;
        let (status, message) = match &err {
            CoreError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
            CoreError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            CoreError::ModelUnavailable => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
            CoreError::Persistence(detail) => {
                error!("Store write failed: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            CoreError::Io(io_err) => {
                error!("I/O failure: {io_err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            CoreError::Internal(detail) => {
                error!("Internal fault: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

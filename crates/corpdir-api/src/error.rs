//! HTTP error mapping.

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::error;

/// Error returned by every handler; renders as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Internal(corpdir_core::Error),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<corpdir_core::Error> for ApiError {
    fn from(err: corpdir_core::Error) -> Self {
        use corpdir_core::Error;

        if err.is_unique_violation() {
            return ApiError::Conflict(err.to_string());
        }
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) | Error::Import(msg) | Error::Serialization(msg) => {
                ApiError::BadRequest(msg)
            }
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into HTTP responses with a JSON body and status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eventboard_storage::StorageError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to JSON response: `{"error": "message"}`.
///
/// `Internal` logs the real error server-side and returns a static message
/// to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: invalid input from caller.
    BadRequest(String),
    /// 401 Unauthorized: missing or invalid credentials.
    Unauthorized(String),
    /// 403 Forbidden: authenticated but lacking the required role.
    Forbidden(String),
    /// 404 Not Found
    NotFound(String),
    /// 422 Unprocessable Entity: valid syntax but semantic rejection (e.g., duplicate).
    UnprocessableEntity(String),
    /// 500 Internal Server Error. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            },
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<eventboard_service::ServiceError> for ApiError {
    fn from(err: eventboard_service::ServiceError) -> Self {
        use eventboard_service::ServiceError;
        match err {
            _ if err.is_duplicate() => Self::UnprocessableEntity(err.to_string()),
            ServiceError::Storage(StorageError::NotFound { entity, id }) => {
                Self::NotFound(format!("{entity} '{id}' not found"))
            },
            ServiceError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            _ => Self::Internal(err.into()),
        }
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these,
// never on the human-readable message string.

/// Stable error code constants.
///
/// Clients should match on `code` from `{"code": "NOT_FOUND", "message": "..."}`.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const INTERNAL: &str = "INTERNAL";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified service error type used by every HomeCook module.
///
/// Each variant maps to a stable error code (see [`error_code`]) and an
/// HTTP status code. The JSON response always includes both:
///
/// ```json
/// {"code": "NOT_FOUND", "message": "Recipe with ID 7 not found."}
/// ```
///
/// Server-side failures (500) also carry an `error_id` that is written to
/// the log next to the underlying cause, so a user report can be matched
/// to a log line without leaking internals.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Resource does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate like/save/rating, duplicate email or role. HTTP 400.
    #[error("{0}")]
    Conflict(String),

    /// Input data is invalid. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid authentication credentials. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not the owner and not an administrator. HTTP 403.
    #[error("{0}")]
    PermissionDenied(String),

    /// Storage backend failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ServiceError::PermissionDenied(_) => error_code::PERMISSION_DENIED,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            let error_id = crate::new_id();
            tracing::error!(%error_id, code = self.error_code(), "request failed: {}", self);
            let body = serde_json::json!({
                "code": self.error_code(),
                "message": "An error occurred while processing your request.",
                "error_id": error_id,
            });
            return (status, axum::Json(body)).into_response();
        }

        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Stable error code constants.
///
/// Clients match on `code` from `{"code": "NOT_FOUND", "message": "..."}`;
/// codes never change, messages may be reworded.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

/// Error taxonomy for the resource service and its API surface.
///
/// `Validation` is rejected input, `NotFound` a missing resource id, `Storage`
/// an underlying persistence failure surfaced untranslated (no retry).
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or invalid input. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// No resource with the given id. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Persistence layer failure. HTTP 500.
    #[error("{0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(id: i64) -> Self {
        ServiceError::NotFound(format!("no resource with id {}", id))
    }

    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(e: anyhow::Error) -> Self {
        ServiceError::Storage(format!("{:#}", e))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

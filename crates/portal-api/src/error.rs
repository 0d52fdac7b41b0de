//! Error types for the portal API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur in portal API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Object storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    /// Relay error.
    #[error("Relay error: {0}")]
    Notify(#[from] notifier::NotifyError),

    /// Missing or invalid bearer token.
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated, but not allowed to touch this resource.
    #[error("Access denied")]
    Forbidden,

    /// Input failed validation.
    #[error("{0}")]
    Validation(#[from] database::ValidationError),

    /// Malformed or incomplete request.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Database(err) => match err {
                DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
                DatabaseError::Validation(_) => StatusCode::BAD_REQUEST,
                DatabaseError::Transition(_)
                | DatabaseError::AlreadyExists { .. }
                | DatabaseError::Conflict { .. } => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Storage(storage::StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Notify(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for portal API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

//! Unified error handling with Sentry integration.
//!
//! Mirrors the storefront's `AppError`: backend statuses map onto client
//! statuses, server-class failures are captured to Sentry, and 409s are
//! surfaced verbatim for the user to retry manually.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// AIMS backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated or lacks a staff role.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Internal(_) => true,
            Self::Backend(err) => matches!(
                err,
                BackendError::Http(_) | BackendError::Api { .. } | BackendError::Parse(_)
            ),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, message) = match &self {
            Self::Backend(err) => match err {
                BackendError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                BackendError::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
                }
                BackendError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                BackendError::Conflict(_) => (
                    StatusCode::CONFLICT,
                    "A conflicting operation is in progress. Please try again later.".to_string(),
                ),
                BackendError::Http(_) | BackendError::Api { .. } | BackendError::Parse(_) => {
                    (StatusCode::BAD_GATEWAY, "External service error".to_string())
                }
            },
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_conflict_surfaces_as_409() {
        assert_eq!(
            status_of(BackendError::Conflict("locked".into()).into()),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_surfaces_as_400() {
        assert_eq!(
            status_of(BackendError::Validation("bad barcode".into()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_transport_failures_are_bad_gateway() {
        assert_eq!(
            status_of(
                BackendError::Api {
                    status: 503,
                    message: "down".into()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
    }
}

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// AIMS backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The checkout session is missing or has expired.
    #[error("Checkout session expired")]
    CheckoutExpired,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error should be captured to Sentry.
    ///
    /// Validation failures and conflicts are expected traffic; transport
    /// failures and upstream 5xx are not.
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
                    // Manual retry only; the client decides when
                    "A conflicting operation is in progress. Please try again later.".to_string(),
                ),
                BackendError::Http(_) | BackendError::Api { .. } | BackendError::Parse(_) => {
                    (StatusCode::BAD_GATEWAY, "External service error".to_string())
                }
            },
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::CheckoutExpired => (
                StatusCode::GONE,
                "Your checkout session has expired. Please start again from the cart.".to_string(),
            ),
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
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Unauthorized("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::BadRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::CheckoutExpired), StatusCode::GONE);
        assert_eq!(
            status_of(AppError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_backend_status_mapping() {
        assert_eq!(
            status_of(BackendError::Validation("bad".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(BackendError::Conflict("busy".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(BackendError::Unauthorized.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(
                BackendError::Api {
                    status: 500,
                    message: "boom".into()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
    }
}

//! Application error types for the dashboard.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::backend::BackendError;

/// Top-level application error.
///
/// Upstream failures are never fatal to the dashboard process; they render
/// as an error response (or, in fragment handlers, as a toast) and the
/// user can retry.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream API call failed.
    #[error("Upstream error: {0}")]
    Backend(#[from] BackendError),

    /// Authentication required.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found")]
    NotFound,

    /// Malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Backend(err) => {
                tracing::error!(error = %err, "upstream API error");
                sentry::capture_message(&format!("upstream API error: {err}"), sentry::Level::Error);
                (StatusCode::BAD_GATEWAY, "External service error")
            }
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                sentry::capture_message(&format!("internal error: {err}"), sentry::Level::Error);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_maps_to_bad_gateway() {
        let err = AppError::Backend(BackendError::Parse("bad json".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = AppError::BadRequest("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_display_includes_source() {
        let err = AppError::Backend(BackendError::Rejected("denied".to_string()));
        assert!(err.to_string().contains("denied"));
    }
}

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures store-layer failures to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Every user-facing error carries a stable
//! machine-checkable `kind` plus a human-readable message; internal detail
//! is only logged, never exposed.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type covering the full error taxonomy.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing request fields.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed entity identifier (distinct from a lookup miss).
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// No valid session attached to the request.
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but insufficient role or ownership.
    #[error("Forbidden")]
    Forbidden,

    /// Referenced entity absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Order status target outside the allowed set.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Requested quantity exceeds available stock.
    #[error("Not enough stock")]
    InsufficientStock,

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Underlying store I/O failure.
    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    /// Stable machine-checkable error kind for the JSON body.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidId(_) => "invalid_id",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::InvalidStatus(_) => "invalid_status",
            Self::InsufficientStock => "insufficient_stock",
            Self::Auth(err) => match err {
                AuthError::EmailTaken => "email_taken",
                AuthError::InvalidCredentials => "invalid_credentials",
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) | AuthError::MissingField(_) => {
                    "invalid_input"
                }
                AuthError::PasswordHash | AuthError::Repository(_) => "store_unavailable",
            },
            Self::Store(_) | Self::Session(_) => "store_unavailable",
        }
    }

    /// HTTP status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::InvalidId(_) | Self::InvalidStatus(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientStock => StatusCode::CONFLICT,
            Self::Auth(err) => match err {
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Store(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error should be captured to Sentry.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Store(_)
                | Self::Session(_)
                | Self::Auth(AuthError::PasswordHash | AuthError::Repository(_))
        )
    }

    /// Client-facing message. Store failures collapse to a generic message.
    fn message(&self) -> String {
        if self.is_server_error() {
            "Data store unavailable".to_string()
        } else {
            match self {
                Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_string(),
                Self::Auth(AuthError::EmailTaken) => "Email already registered".to_string(),
                other => other.to_string(),
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry before responding
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = json!({
            "error": {
                "kind": self.kind(),
                "message": self.message(),
            }
        });

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidId("abc".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotFound("order".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidStatus("refunded".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InsufficientStock.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Auth(AuthError::EmailTaken).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_stable_kinds() {
        assert_eq!(AppError::InvalidInput("x".into()).kind(), "invalid_input");
        assert_eq!(AppError::InvalidId("x".into()).kind(), "invalid_id");
        assert_eq!(AppError::Unauthorized.kind(), "unauthorized");
        assert_eq!(AppError::Forbidden.kind(), "forbidden");
        assert_eq!(AppError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(AppError::InvalidStatus("x".into()).kind(), "invalid_status");
        assert_eq!(AppError::InsufficientStock.kind(), "insufficient_stock");
        assert_eq!(AppError::Auth(AuthError::EmailTaken).kind(), "email_taken");
        assert_eq!(
            AppError::Auth(AuthError::InvalidCredentials).kind(),
            "invalid_credentials"
        );
        assert_eq!(
            AppError::Store(RepositoryError::Database(sqlx::Error::RowNotFound)).kind(),
            "store_unavailable"
        );
    }

    #[test]
    fn test_store_error_message_is_generic() {
        let err = AppError::Store(RepositoryError::DataCorruption(
            "secret internal detail".to_string(),
        ));
        assert_eq!(err.message(), "Data store unavailable");
    }

    #[test]
    fn test_credential_errors_are_undifferentiated() {
        // Unknown email and wrong password produce the same kind and message
        let err = AppError::Auth(AuthError::InvalidCredentials);
        assert_eq!(err.kind(), "invalid_credentials");
        assert_eq!(err.message(), "Invalid credentials");
    }
}

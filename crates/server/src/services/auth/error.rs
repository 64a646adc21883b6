//! Authentication error types.

use thiserror::Error;

use stockroom_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email format is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// A required field is missing or empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Wrong email or password.
    ///
    /// Deliberately undifferentiated: an unknown email and a wrong
    /// password produce the same error to resist account enumeration.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

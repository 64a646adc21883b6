//! Admin user provisioning.
//!
//! Registration through the API always creates regular users; admin
//! accounts are created only through this command.

use thiserror::Error;

use stockroom_core::{Email, EmailError};

use super::CommandError;

/// Minimum admin password length, matching the registration rule.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Errors that can occur during admin provisioning.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    /// Shared command failure (env, connection, query).
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl From<sqlx::Error> for AdminError {
    fn from(err: sqlx::Error) -> Self {
        Self::Command(CommandError::Database(err))
    }
}

/// Create a new admin user.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `password` - Plaintext password, hashed before storage
///
/// # Returns
///
/// The ID of the created admin user.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<i32, AdminError> {
    let email = Email::parse(email)?;

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword);
    }

    let password_hash = stockroom_server::services::auth::hash_password(password)
        .map_err(|_| AdminError::PasswordHash)?;

    let pool = super::connect().await?;

    tracing::info!("Creating admin user: {email}");

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(AdminError::UserExists(email.to_string()));
    }

    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, role)
         VALUES ($1, $2, $3, 'admin')
         RETURNING id",
    )
    .bind(name)
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&pool)
    .await?;

    tracing::info!("Admin user created successfully! ID: {user_id}, Email: {email}");

    Ok(user_id)
}

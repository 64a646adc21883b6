//! Database operations for the Stockroom `PostgreSQL` store.
//!
//! # Tables
//!
//! - `users` - Registration/login accounts (credential store)
//! - `products` - Product catalog (catalog store)
//! - `orders` - Order records (order store)
//! - `session` - Tower-sessions storage (session registry)
//!
//! Each collection gets its own repository struct borrowing the shared
//! pool. The product row is the only contended resource; it is mutated
//! exclusively through single-statement conditional updates, never through
//! read-modify-write in application memory.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are run explicitly
//! via `stockroom-cli migrate`, never on server startup.

pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Embedded sqlx migrator for the server schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

//! Database migration command.
//!
//! Runs the embedded schema migrations from `crates/server/migrations/`
//! and then the tower-sessions store migration that creates the session
//! table. The server never migrates on startup; this command is the only
//! place the schema changes.

use tower_sessions_sqlx_store::PostgresStore;

use super::CommandError;

/// Run all database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running schema migrations...");
    stockroom_server::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Running session store migration...");
    let store = PostgresStore::new(pool.clone());
    store.migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

//! Database migration command.
//!
//! Applies the SQL files in `crates/api/migrations/`, which are embedded at
//! compile time.
//!
//! # Environment Variables
//!
//! - `STORE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: STORE_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = super::database_url().ok_or(MigrationError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to store database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

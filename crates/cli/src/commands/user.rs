//! Credential management commands.
//!
//! # Environment Variables
//!
//! - `STORE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STORE_USER_SECRET` - Secret for `user create` when `--secret` is omitted

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

use store_manager_api::db::{RepositoryError, UserRepository};
use store_manager_api::services::auth::{AuthError, hash_secret};
use store_manager_core::{Email, EmailError, UserId};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Missing environment variable: STORE_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Secret cannot be empty")]
    EmptySecret,

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Could not hash secret: {0}")]
    Hash(#[from] AuthError),
}

/// Create a credential record with a hashed secret.
///
/// Duplicate emails are allowed, matching the open `/auth/register` endpoint.
///
/// # Errors
///
/// Returns `UserError` if the input is invalid or the insert fails.
pub async fn create(email: &str, secret: &SecretString) -> Result<UserId, UserError> {
    let email = Email::parse(email)?;
    if secret.expose_secret().is_empty() {
        return Err(UserError::EmptySecret);
    }

    let database_url = super::database_url().ok_or(UserError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to store database...");
    let pool = PgPool::connect(&database_url).await?;

    let secret_hash = hash_secret(secret.expose_secret())?;
    let user = UserRepository::new(&pool).create(&email, &secret_hash).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User created");
    Ok(user.id)
}

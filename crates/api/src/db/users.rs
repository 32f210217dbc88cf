//! User repository for database operations.
//!
//! Only hashed secrets are ever written or read here.

use sqlx::PgPool;

use store_manager_core::{Email, UserId};

use super::RepositoryError;
use crate::models::User;

/// Internal row type for credential queries.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: i32,
    email: String,
    secret_hash: String,
}

impl CredentialRow {
    fn into_parts(self) -> Result<(User, String), RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok((
            User {
                id: UserId::new(self.id),
                email,
            },
            self.secret_hash,
        ))
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a credential record. No uniqueness check is made on the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, email: &Email, secret_hash: &str) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            INSERT INTO store.app_user (email, secret_hash)
            VALUES ($1, $2)
            RETURNING id, email, secret_hash
            ",
        )
        .bind(email.as_str())
        .bind(secret_hash)
        .fetch_one(self.pool)
        .await?;

        row.into_parts().map(|(user, _)| user)
    }

    /// Every credential record registered under an email, oldest first,
    /// paired with its secret hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Vec<(User, String)>, RepositoryError> {
        let rows = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT id, email, secret_hash
            FROM store.app_user
            WHERE email = $1
            ORDER BY id
            ",
        )
        .bind(email.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CredentialRow::into_parts).collect()
    }
}

//! Database operations for the store `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `store.product` - Catalog items with four fixed photo slots
//! - `store.variant` - Size/color stock rows owned by a product (cascade delete)
//! - `store.app_user` - Login credential records (hashed secrets)
//! - `store.sale` - Recorded checkouts
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p store-manager-cli -- migrate
//! ```

pub mod products;
pub mod sales;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use products::ProductRepository;
pub use sales::SaleRepository;
pub use users::UserRepository;

/// `SQLSTATE` for `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";
/// `SQLSTATE` for `deadlock_detected`.
const DEADLOCK_DETECTED: &str = "40P01";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The row changed underneath a write (deleted, locked out or
    /// serialization failure).
    #[error("concurrent modification: {0}")]
    Concurrency(String),
}

impl RepositoryError {
    /// Classify a write error, separating concurrent-modification failures
    /// from other database errors.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_foreign_key_violation() {
                return Self::Concurrency("parent row no longer exists".to_owned());
            }
            if matches!(
                db_err.code().as_deref(),
                Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
            ) {
                return Self::Concurrency(db_err.message().to_owned());
            }
        }
        Self::Database(err)
    }
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

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    /// Minimal driver error carrying a `SQLSTATE` and a constraint kind.
    #[derive(Debug)]
    struct StubDbError {
        code: &'static str,
        foreign_key: bool,
    }

    impl fmt::Display for StubDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "stub error {}", self.code)
        }
    }

    impl StdError for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "could not serialize access"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.foreign_key {
                ErrorKind::ForeignKeyViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    fn db_error(code: &'static str, foreign_key: bool) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError { code, foreign_key }))
    }

    #[test]
    fn test_foreign_key_violation_is_concurrency() {
        assert!(matches!(
            RepositoryError::from_write(db_error("23503", true)),
            RepositoryError::Concurrency(_)
        ));
    }

    #[test]
    fn test_serialization_failure_and_deadlock_are_concurrency() {
        for code in [SERIALIZATION_FAILURE, DEADLOCK_DETECTED] {
            assert!(
                matches!(
                    RepositoryError::from_write(db_error(code, false)),
                    RepositoryError::Concurrency(_)
                ),
                "{code}"
            );
        }
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        assert!(matches!(
            RepositoryError::from_write(db_error("22003", false)),
            RepositoryError::Database(_)
        ));
        assert!(matches!(
            RepositoryError::from_write(sqlx::Error::RowNotFound),
            RepositoryError::Database(_)
        ));
    }
}

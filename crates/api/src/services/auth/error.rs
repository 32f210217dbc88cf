//! Authentication error types.

use thiserror::Error;

use store_manager_core::EmailError;

use super::token::TokenError;
use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email rejected at registration.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Secret was empty at registration.
    #[error("secret cannot be empty")]
    EmptySecret,

    /// Invalid credentials (unknown email or wrong secret).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Session token could not be issued.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

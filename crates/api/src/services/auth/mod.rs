//! Authentication service.
//!
//! Email/secret credentials hashed with Argon2id, exchanged at login for a
//! signed session token.

mod error;
mod token;

pub use error::AuthError;
pub use token::{Claims, IssuedToken, TOKEN_TTL, TokenError, TokenSigner};

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

use store_manager_core::Email;

use crate::db::UserRepository;
use crate::models::User;

/// A successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub email: Email,
    pub token: IssuedToken,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenSigner,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenSigner) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Store a new credential record.
    ///
    /// Registration is open and does not check whether the email is already
    /// in use.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::EmptySecret` if the secret is empty.
    /// Returns `AuthError::Repository` if the insert fails.
    pub async fn register(&self, email: &str, secret: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }

        let secret_hash = hash_secret(secret)?;
        let user = self.users.create(&email, &secret_hash).await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Exchange an email and secret for a session token.
    ///
    /// Every stored record with this email is tried; any match succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown or malformed
    /// email, or a secret that matches no record.
    pub async fn login(
        &self,
        email: &str,
        secret: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        let Ok(email) = Email::parse(email) else {
            verify_dummy(secret);
            warn!("Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        };

        let candidates = self.users.find_credentials(&email).await?;
        let Some(user) = matching_user(secret, candidates) else {
            warn!("Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        };

        let token = self.tokens.issue(user.email.as_str(), now)?;

        info!(user_id = %user.id, "User logged in");
        Ok(Session {
            email: user.email,
            token,
        })
    }
}

// =============================================================================
// Secret Hashing
// =============================================================================

/// Hash verified against when a login names no stored record. Every failed
/// login runs at least one Argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_secret("no-such-user-placeholder").ok());

fn verify_dummy(secret: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_secret(secret, hash);
    }
}

/// The first candidate whose stored hash accepts `secret`.
///
/// An empty candidate list still runs one verification.
fn matching_user(secret: &str, candidates: Vec<(User, String)>) -> Option<User> {
    if candidates.is_empty() {
        verify_dummy(secret);
        return None;
    }

    candidates
        .into_iter()
        .find(|(_, hash)| verify_secret(secret, hash).is_ok())
        .map(|(user, _)| user)
}

/// Hash a secret with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_secret(secret: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a secret against a stored PHC hash string.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the secret doesn't match or
/// the stored hash can't be parsed.
pub fn verify_secret(secret: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

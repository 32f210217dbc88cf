//! Credential record domain types.

use store_manager_core::{Email, UserId};

/// A user able to log in to the admin console.
///
/// The stored secret hash never leaves the repository layer except through
/// [`crate::db::UserRepository::find_credentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login identifier.
    pub email: Email,
}

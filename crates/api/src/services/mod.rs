//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Credential registration, login and session tokens
//! - `catalog` - Product CRUD and variant replacement
//! - `checkout` - Turning a cart of product ids into a sale
//! - `dashboard` - Admin summary aggregates
//!
//! Services borrow the pool per request and hold no state between calls.

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod dashboard;

pub use auth::{AuthError, AuthService, Session, TokenError, TokenSigner};
pub use catalog::{CatalogError, CatalogService};
pub use checkout::{CheckoutError, CheckoutService};
pub use dashboard::DashboardService;

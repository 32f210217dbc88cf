//! Store Manager Core - Shared domain types.
//!
//! This crate provides the value types used across the store manager:
//! - `api` - HTTP backend for the admin console and the public storefront
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Enable the `postgres` feature to get `sqlx` encoding for
//! the newtypes.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, emails, prices and product photo slots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

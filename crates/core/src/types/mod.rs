//! Core types for the store manager.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod photos;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use photos::{PHOTO_SLOT_COUNT, PhotoSlots};
pub use price::{Price, PriceError};

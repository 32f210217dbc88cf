//! Domain models for the store manager API.
//!
//! These are the validated shapes handlers exchange with services; the
//! repositories keep their own row types and convert at the boundary.

pub mod dashboard;
pub mod product;
pub mod sale;
pub mod user;

pub use dashboard::DashboardStats;
pub use product::{
    InvalidProduct, Product, ProductDraft, ProductInput, Variant, VariantDraft, VariantInput,
};
pub use sale::Sale;
pub use user::User;

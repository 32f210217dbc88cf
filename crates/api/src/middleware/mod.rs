//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, HTTP transactions)
//! 2. CORS (from `STORE_CORS_ORIGINS`)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//!
//! Authentication is an extractor, not a layer: handlers that take
//! [`RequireAuth`] reject unauthenticated calls.

pub mod auth;
pub mod request_id;

pub use auth::{AuthRejection, AuthenticatedUser, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware, request_span};

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Bodies are plain text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CatalogError, CheckoutError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid session token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Write lost to a concurrent modification.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => Self::NotFound(err.to_string()),
            CatalogError::IdMismatch { .. } | CatalogError::Invalid(_) => {
                Self::BadRequest(err.to_string())
            }
            CatalogError::Conflict(_) => Self::Conflict(err.to_string()),
            CatalogError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart | CheckoutError::TotalTooLarge(_) => {
                Self::BadRequest(err.to_string())
            }
            CheckoutError::Repository(e) => Self::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::InvalidEmail(_) | AuthError::EmptySecret => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Token(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::EmptySecret => "Secret cannot be empty".to_string(),
                _ => "Authentication error".to_string(),
            },
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the current request.
///
/// Call this once a request has been authenticated to associate errors with
/// the caller.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_owned()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use store_manager_core::{EmailError, PriceError, ProductId};

    use super::*;
    use crate::models::InvalidProduct;

    fn get_status(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_catalog_error_status_codes() {
        let id = ProductId::new(5);
        assert_eq!(get_status(CatalogError::NotFound(id)), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(CatalogError::IdMismatch {
                path: id,
                body: ProductId::new(6),
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(CatalogError::Invalid(InvalidProduct::EmptyName)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(CatalogError::Conflict(id)), StatusCode::CONFLICT);
        assert_eq!(
            get_status(CatalogError::Repository(RepositoryError::DataCorruption(
                "bad".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_checkout_error_status_codes() {
        assert_eq!(get_status(CheckoutError::EmptyCart), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(CheckoutError::TotalTooLarge(PriceError::TooLarge(Decimal::MAX))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_oversized_price_is_bad_request() {
        let err = CatalogError::Invalid(InvalidProduct::Price {
            field: "salePrice",
            source: PriceError::TooLarge(Decimal::MAX),
        });
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            get_status(AuthError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::InvalidEmail(EmailError::Empty)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AuthError::EmptySecret), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(AuthError::PasswordHash),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

//! Bearer token authentication extractor.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderValue, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::error::set_sentry_user;
use crate::services::TokenError;
use crate::state::AppState;

/// The caller identified by a valid session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// Extractor that requires a valid `Authorization: Bearer <token>` header.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub AuthenticatedUser);

/// Why a request was refused before reaching the handler.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// No bearer credentials were sent.
    MissingToken,
    /// A token was sent but did not verify.
    InvalidToken(TokenError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingToken => "Unauthorized: missing bearer token".to_string(),
            Self::InvalidToken(err) => format!("Unauthorized: {err}"),
        };

        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))],
            message,
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let state = AppState::from_ref(state);
        let claims = state.tokens().verify(token, Utc::now()).map_err(|err| {
            tracing::debug!(error = %err, "Rejected session token");
            AuthRejection::InvalidToken(err)
        })?;

        set_sentry_user(&claims.sub);

        Ok(Self(AuthenticatedUser { email: claims.sub }))
    }
}

/// The token from an `Authorization: Bearer` header, if present and non-empty.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/products/dashboard");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        let parts = parts_with(Some("bearer abc"));
        assert_eq!(bearer_token(&parts), Some("abc"));
    }

    #[test]
    fn test_other_schemes_and_blanks_are_ignored() {
        assert_eq!(bearer_token(&parts_with(None)), None);
        assert_eq!(bearer_token(&parts_with(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer   "))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer"))), None);
    }

    #[test]
    fn test_rejection_is_401_with_challenge() {
        let response = AuthRejection::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}

//! Registration and login.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::services::AuthService;
use crate::state::AppState;

/// Credentials body shared by register and login.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub secret: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Store a credential record.
///
/// POST /auth/register
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<&'static str> {
    AuthService::new(state.pool(), state.tokens())
        .register(&body.email, &body.secret)
        .await?;

    Ok("User registered")
}

/// Exchange credentials for a bearer token.
///
/// POST /auth/login
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>> {
    let session = AuthService::new(state.pool(), state.tokens())
        .login(&body.email, &body.secret, Utc::now())
        .await?;

    Ok(Json(LoginResponse {
        token: session.token.token,
        email: session.email.into_inner(),
        expires_at: session.token.expires_at,
    }))
}

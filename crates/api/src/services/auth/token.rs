//! Session tokens.
//!
//! Tokens are compact JWTs signed with HMAC-SHA256 (`HS256`). The payload
//! carries the user's email as `sub` plus `iat`/`exp` in Unix seconds.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

/// How long an issued token stays valid.
pub const TOKEN_TTL: TimeDelta = TimeDelta::hours(8);

type HmacSha256 = Hmac<Sha256>;

/// Errors from issuing or verifying a token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("unsupported token algorithm")]
    UnsupportedAlgorithm,

    #[error("invalid token signature")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated email.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Signs and verifies session tokens with one shared key.
#[derive(Clone)]
pub struct TokenSigner {
    key: SecretString,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl TokenSigner {
    #[must_use]
    pub const fn new(key: SecretString) -> Self {
        Self { key }
    }

    /// Issue a token for `subject`, valid from `now` for [`TOKEN_TTL`].
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if the claims cannot be serialized.
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now + TOKEN_TTL;
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let header = Header {
            alg: "HS256".to_owned(),
            typ: "JWT".to_owned(),
        };

        let header = encode_segment(&header)?;
        let payload = encode_segment(&claims)?;
        let signing_input = format!("{header}.{payload}");

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(IssuedToken {
            token: format!("{signing_input}.{signature}"),
            expires_at,
        })
    }

    /// Verify a token's signature and expiry at `now`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the token is malformed, not `HS256`, signed
    /// with a different key, or expired.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let decoded: Header = decode_segment(header)?;
        if decoded.alg != "HS256" {
            return Err(TokenError::UnsupportedAlgorithm);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = decode_segment(payload)?;
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|e| TokenError::Encoding(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

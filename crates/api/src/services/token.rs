//! Signed access tokens.
//!
//! Tokens are HS256 JWTs carrying the user id (`sub`), an issue time, and
//! an expiry. Clients present them either as a bearer header or a `token`
//! query parameter; verification checks both signature and expiry.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bazaar_core::UserId;

/// Errors that can occur when issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's expiry is in the past.
    #[error("token expired")]
    Expired,

    /// The token is malformed or its signature does not verify.
    #[error("invalid token")]
    Invalid,

    /// Signing failed while issuing a token.
    #[error("failed to sign token")]
    Signing,
}

/// JWT claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id the token was issued to.
    sub: i64,
    /// Issued-at, seconds since the epoch.
    iat: i64,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// Mints and verifies access tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    /// Create a token service from a signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway: an expired token is expired
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret_bytes),
            decoding: DecodingKey::from_secret(secret_bytes),
            validation,
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Issue a token for a user, expiring after the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue_at(user_id, chrono::Utc::now().timestamp())
    }

    /// Verify a token and return the embedded user id.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for a stale token and
    /// `TokenError::Invalid` for anything else that fails verification.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        Ok(UserId::new(data.claims.sub))
    }

    fn issue_at(&self, user_id: UserId, now: i64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.as_i64(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Signing)
    }
}

//! Authentication extractor.
//!
//! Provides an extractor for requiring a verified access token in route
//! handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use bazaar_core::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// The caller's identity, as proven by their access token.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// Verified user id from the token's `sub` claim.
    pub user_id: UserId,
}

/// Extractor that requires a valid access token.
///
/// The token is taken from the `Authorization: Bearer` header, or from the
/// `token` query parameter for clients that pass it on the URL. Requests
/// without a verifiable token are rejected with 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", user.user_id)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| query_token(parts))
            .ok_or_else(|| AppError::Unauthorized("missing access token".to_string()))?;

        let user_id = state.tokens().verify(&token)?;

        Ok(Self(CurrentUser { user_id }))
    }
}

/// Extract the token from an `Authorization: Bearer` header.
fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(axum::http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_owned)
}

/// Extract the token from a `token` query parameter.
///
/// Tokens are base64url, so no percent-decoding is needed.
fn query_token(parts: &Parts) -> Option<String> {
    let query = parts.uri.query()?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

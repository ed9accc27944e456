//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{Email, UserId, Username};

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User record returned to clients. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Access token response.
#[derive(Debug, Serialize)]
pub struct TokenBody {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserBody>)> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register(&body.email, &body.username, &body.password)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange credentials for an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenBody>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await?;

    let access_token = state.tokens().issue(user.id)?;

    tracing::debug!(user_id = %user.id, "login succeeded");

    Ok(Json(TokenBody {
        access_token,
        token_type: "bearer",
    }))
}

/// Return the authenticated user's record.
pub async fn me(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<UserBody>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.user_id)
        .await?
        // A valid token for a deleted account is still unauthenticated
        .ok_or_else(|| AppError::Unauthorized("unknown user".to_string()))?;

    Ok(Json(user.into()))
}

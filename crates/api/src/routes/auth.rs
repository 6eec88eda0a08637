//! Credential exchange route handler.

use axum::{Json, extract::State};
use bazaar_core::{Email, UserId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{ProfileRepository, TokenRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::services::auth::{generate_token, verify_password};
use crate::state::AppState;

/// Credential exchange request body.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Token response with basic profile fields.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: UserId,
    pub email: Email,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Exchange username + password for an opaque bearer token.
///
/// Gets-or-creates the user's profile as a side effect, so a profile always
/// exists by the time the client can ask for one.
#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>> {
    let (user, password_hash) = UserRepository::new(state.pool())
        .get_credentials(&body.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_owned()))?;

    let valid = verify_password(&body.password, &password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_owned()));
    }

    let token = TokenRepository::new(state.pool())
        .get_or_create(user.id, &generate_token())
        .await?;

    // Lazy profile provisioning fallback (registration normally covers this)
    ProfileRepository::new(state.pool())
        .get_or_create(user.id)
        .await?;

    tracing::info!(user_id = %user.id, "Token issued");

    Ok(Json(TokenResponse {
        token,
        user_id: user.id,
        email: user.email,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
    }))
}

//! User route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bazaar_core::{Email, UserId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{TokenRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::services::auth::{generate_token, hash_password};
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Registration response: a token plus basic fields.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub user_id: UserId,
    pub email: Email,
    pub username: String,
}

/// User update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Register a new user.
///
/// Creates the user and their profile in one transaction and issues a
/// bearer token immediately.
#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    if body.username.trim().is_empty() {
        return Err(AppError::BadRequest("username is required".to_owned()));
    }
    if body.password.is_empty() {
        return Err(AppError::BadRequest("password is required".to_owned()));
    }
    let email = Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let password_hash =
        hash_password(&body.password).map_err(|e| AppError::Internal(e.to_string()))?;

    let user = UserRepository::new(state.pool())
        .create(
            body.username.trim(),
            &email,
            &body.first_name,
            &body.last_name,
            &password_hash,
        )
        .await?;

    let token = TokenRepository::new(state.pool())
        .get_or_create(user.id, &generate_token())
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token,
            user_id: user.id,
            email: user.email,
            username: user.username,
        }),
    ))
}

/// List all users.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// Get a user by ID.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))?;
    Ok(Json(user))
}

/// Get the authenticated user.
#[instrument(skip_all)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Update a user's mutable fields.
#[instrument(skip(state, _current, body))]
pub async fn update(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let email = Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = UserRepository::new(state.pool())
        .update(id, &email, &body.first_name, &body.last_name)
        .await?;

    Ok(Json(user))
}

/// Delete a user.
#[instrument(skip(state, _current))]
pub async fn delete(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    let deleted = UserRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("user {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

//! Profile route handlers.
//!
//! Listing is self-scoped: a user only ever sees their own profile in the
//! collection. Retrieval by ID is open to any authenticated user.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bazaar_core::ProfileId;
use serde::Deserialize;
use tracing::instrument;

use crate::db::{ProfileRepository, profiles::ProfileFields};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Profile;
use crate::state::AppState;

/// Profile create/update request body.
#[derive(Debug, Deserialize, Default)]
pub struct ProfileRequest {
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_picture: Option<String>,
}

impl From<ProfileRequest> for ProfileFields {
    fn from(body: ProfileRequest) -> Self {
        Self {
            bio: body.bio,
            location: body.location,
            profile_picture: body.profile_picture,
        }
    }
}

/// List the authenticated user's profiles.
#[instrument(skip(state, current))]
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Profile>>> {
    let profiles = ProfileRepository::new(state.pool())
        .list_for_user(current.0.id)
        .await?;
    Ok(Json(profiles))
}

/// Get (or lazily create) the authenticated user's profile.
#[instrument(skip(state, current))]
pub async fn me(State(state): State<AppState>, current: CurrentUser) -> Result<Json<Profile>> {
    let profile = ProfileRepository::new(state.pool())
        .get_or_create(current.0.id)
        .await?;
    Ok(Json(profile))
}

/// Get a profile by ID.
#[instrument(skip(state, _current))]
pub async fn get(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<ProfileId>,
) -> Result<Json<Profile>> {
    let profile = ProfileRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile {id} not found")))?;
    Ok(Json(profile))
}

/// Create a profile for the authenticated user.
#[instrument(skip(state, current, body))]
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<ProfileRequest>,
) -> Result<impl IntoResponse> {
    let profile = ProfileRepository::new(state.pool())
        .create(current.0.id, &body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Update a profile.
#[instrument(skip(state, _current, body))]
pub async fn update(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<ProfileId>,
    Json(body): Json<ProfileRequest>,
) -> Result<Json<Profile>> {
    let profile = ProfileRepository::new(state.pool())
        .update(id, &body.into())
        .await?;
    Ok(Json(profile))
}

/// Delete a profile.
#[instrument(skip(state, _current))]
pub async fn delete(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<ProfileId>,
) -> Result<StatusCode> {
    let deleted = ProfileRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("profile {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

//! Category route handlers.
//!
//! Reads are public; writes require authentication.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use bazaar_core::CategoryId;
use serde::Deserialize;
use tracing::instrument;

use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Category;
use crate::state::AppState;

/// Category list query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// Category create/update request body.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub icon: Option<String>,
}

/// List categories, optionally filtered by `?search=`.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool())
        .list(query.search.as_deref())
        .await?;
    Ok(Json(categories))
}

/// Get a category by ID.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>> {
    let category = CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id} not found")))?;
    Ok(Json(category))
}

/// Create a category.
#[instrument(skip(state, _current, body))]
pub async fn create(
    State(state): State<AppState>,
    _current: CurrentUser,
    Json(body): Json<CategoryRequest>,
) -> Result<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }

    let category = CategoryRepository::new(state.pool())
        .create(body.name.trim(), &body.description, body.icon.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category.
#[instrument(skip(state, _current, body))]
pub async fn update(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<CategoryId>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<Category>> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }

    let category = CategoryRepository::new(state.pool())
        .update(id, body.name.trim(), &body.description, body.icon.as_deref())
        .await?;
    Ok(Json(category))
}

/// Delete a category.
#[instrument(skip(state, _current))]
pub async fn delete(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    let deleted = CategoryRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("category {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

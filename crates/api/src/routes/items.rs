//! Item route handlers.
//!
//! Reads are public; writes require authentication. Item detail responses
//! embed the item's reviews.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use bazaar_core::{CategoryId, ItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{ItemRepository, ReviewRepository, items::ItemFields};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Item, Review};
use crate::state::AppState;

/// Item create/update request body.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: CategoryId,
    pub price: Decimal,
    pub image: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

const fn default_available() -> bool {
    true
}

impl ItemRequest {
    fn as_fields(&self) -> ItemFields<'_> {
        ItemFields {
            title: self.title.trim(),
            description: &self.description,
            category_id: self.category,
            price: self.price,
            image: self.image.as_deref(),
            is_available: self.is_available,
        }
    }
}

/// An item together with its reviews.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    #[serde(flatten)]
    pub item: Item,
    pub reviews: Vec<Review>,
}

/// `?category_id=` query for the by-category listing.
#[derive(Debug, Deserialize, Default)]
pub struct ByCategoryQuery {
    pub category_id: Option<CategoryId>,
}

/// `?q=` query for item search.
#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// List all items.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Item>>> {
    let items = ItemRepository::new(state.pool()).list().await?;
    Ok(Json(items))
}

/// Get an item by ID with its reviews.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<ItemResponse>> {
    let item = ItemRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {id} not found")))?;
    let reviews = ReviewRepository::new(state.pool()).list_for_item(id).await?;
    Ok(Json(ItemResponse { item, reviews }))
}

/// List the authenticated user's own items.
#[instrument(skip(state, current))]
pub async fn my_items(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Item>>> {
    let items = ItemRepository::new(state.pool())
        .list_by_creator(current.0.id)
        .await?;
    Ok(Json(items))
}

/// List items in a category. Requires `?category_id=`.
#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Query(query): Query<ByCategoryQuery>,
) -> Result<Json<Vec<Item>>> {
    let Some(category_id) = query.category_id else {
        return Err(AppError::BadRequest("Category ID is required".to_owned()));
    };

    let items = ItemRepository::new(state.pool())
        .list_by_category(category_id)
        .await?;
    Ok(Json(items))
}

/// Search items by title, description, or category name. Requires `?q=`.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Item>>> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AppError::BadRequest("Search query is required".to_owned()));
    }

    let items = ItemRepository::new(state.pool()).search(q).await?;
    Ok(Json(items))
}

/// Create an item owned by the authenticated user.
#[instrument(skip(state, current, body), fields(user_id = %current.0.id))]
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<ItemRequest>,
) -> Result<impl IntoResponse> {
    validate(&body)?;

    let item = ItemRepository::new(state.pool())
        .create(current.0.id, &body.as_fields())
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update an item. Only its creator may change it.
#[instrument(skip(state, current, body))]
pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<ItemId>,
    Json(body): Json<ItemRequest>,
) -> Result<Json<Item>> {
    validate(&body)?;

    let repo = ItemRepository::new(state.pool());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {id} not found")))?;
    if existing.created_by != current.0.id {
        return Err(AppError::Forbidden(
            "only the item's creator may modify it".to_owned(),
        ));
    }

    let item = repo.update(id, &body.as_fields()).await?;
    Ok(Json(item))
}

/// Delete an item. Only its creator may remove it.
#[instrument(skip(state, current))]
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<ItemId>,
) -> Result<StatusCode> {
    let repo = ItemRepository::new(state.pool());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {id} not found")))?;
    if existing.created_by != current.0.id {
        return Err(AppError::Forbidden(
            "only the item's creator may delete it".to_owned(),
        ));
    }

    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate(body: &ItemRequest) -> Result<()> {
    if body.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".to_owned()));
    }
    if body.price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "price must not be negative".to_owned(),
        ));
    }
    Ok(())
}

//! Review route handlers.
//!
//! Reads are public; writing a review requires authentication, and only the
//! review's author may change or remove it.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use bazaar_core::{ItemId, ReviewId};
use serde::Deserialize;
use tracing::instrument;

use crate::db::ReviewRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Review;
use crate::state::AppState;

/// Review create request body.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub item: ItemId,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// Review update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// `?item_id=` query for the per-item listing.
#[derive(Debug, Deserialize, Default)]
pub struct ForItemQuery {
    pub item_id: Option<ItemId>,
}

/// List all reviews.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Review>>> {
    let reviews = ReviewRepository::new(state.pool()).list().await?;
    Ok(Json(reviews))
}

/// Get a review by ID.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<Json<Review>> {
    let review = ReviewRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("review {id} not found")))?;
    Ok(Json(review))
}

/// List reviews for an item. Requires `?item_id=`.
#[instrument(skip(state))]
pub async fn for_item(
    State(state): State<AppState>,
    Query(query): Query<ForItemQuery>,
) -> Result<Json<Vec<Review>>> {
    let Some(item_id) = query.item_id else {
        return Err(AppError::BadRequest("Item ID is required".to_owned()));
    };

    let reviews = ReviewRepository::new(state.pool())
        .list_for_item(item_id)
        .await?;
    Ok(Json(reviews))
}

/// Create a review authored by the authenticated user.
#[instrument(skip(state, current, body), fields(user_id = %current.0.id))]
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse> {
    validate_rating(body.rating)?;

    let review = ReviewRepository::new(state.pool())
        .create(current.0.id, body.item, body.rating, &body.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Update a review. Only its author may change it.
#[instrument(skip(state, current, body))]
pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<ReviewId>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<Review>> {
    validate_rating(body.rating)?;

    let repo = ReviewRepository::new(state.pool());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("review {id} not found")))?;
    if existing.user != current.0.id {
        return Err(AppError::Forbidden(
            "only the review's author may modify it".to_owned(),
        ));
    }

    let review = repo.update(id, body.rating, &body.comment).await?;
    Ok(Json(review))
}

/// Delete a review. Only its author may remove it.
#[instrument(skip(state, current))]
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<ReviewId>,
) -> Result<StatusCode> {
    let repo = ReviewRepository::new(state.pool());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("review {id} not found")))?;
    if existing.user != current.0.id {
        return Err(AppError::Forbidden(
            "only the review's author may delete it".to_owned(),
        ));
    }

    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_rating(rating: i32) -> Result<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".to_owned(),
        ));
    }
    Ok(())
}

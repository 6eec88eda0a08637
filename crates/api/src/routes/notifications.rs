//! Notification route handlers.
//!
//! Notifications are read-only from the client's perspective apart from the
//! read flags; they are created by the order-event handler.

use axum::{
    Json,
    extract::{Path, State},
};
use bazaar_core::NotificationId;
use serde_json::{Value, json};
use tracing::instrument;

use crate::db::{NotificationRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Notification;
use crate::state::AppState;

/// List the authenticated user's notifications, newest first.
#[instrument(skip(state, current))]
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Notification>>> {
    let notifications = NotificationRepository::new(state.pool())
        .list_for_user(current.0.id)
        .await?;
    Ok(Json(notifications))
}

/// Get one of the authenticated user's notifications.
#[instrument(skip(state, current))]
pub async fn get(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<Notification>> {
    let notification = NotificationRepository::new(state.pool())
        .get_for_user(id, current.0.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("notification {id} not found")))?;
    Ok(Json(notification))
}

/// Mark a single notification as read.
#[instrument(skip(state, current))]
pub async fn mark_as_read(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<Value>> {
    NotificationRepository::new(state.pool())
        .mark_as_read(id, current.0.id)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("notification {id} not found"))
            }
            other => other.into(),
        })?;

    Ok(Json(json!({"status": "notification marked as read"})))
}

/// Mark all of the authenticated user's notifications as read.
#[instrument(skip(state, current))]
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Value>> {
    let updated = NotificationRepository::new(state.pool())
        .mark_all_as_read(current.0.id)
        .await?;

    tracing::debug!(user_id = %current.0.id, updated, "Notifications marked read");

    Ok(Json(json!({"status": "all notifications marked as read"})))
}

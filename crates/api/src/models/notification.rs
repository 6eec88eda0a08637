//! Notification model.

use bazaar_core::{NotificationId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A notification for a user.
///
/// Created only by the order-event handler, never directly through the
/// public API.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub user: UserId,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

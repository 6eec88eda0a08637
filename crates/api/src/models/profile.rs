//! User profile model.

use bazaar_core::{Email, ProfileId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A user profile (one-to-one with a user).
///
/// `username` and `email` are denormalized from the owning user for the
/// response body; the repository fills them via a join.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: ProfileId,
    pub user: UserId,
    pub username: String,
    pub email: Email,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub date_joined: DateTime<Utc>,
}

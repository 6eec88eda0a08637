//! Category, item, and review models.

use bazaar_core::{CategoryId, ItemId, ReviewId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// An item category.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
}

/// A marketplace listing.
///
/// `category_name`, `created_by_username`, and `average_rating` are derived
/// on read: the names via joins, the rating as the arithmetic mean over the
/// item's reviews (0 when there are none). Nothing is cached; every read
/// recomputes from the review set.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub category: CategoryId,
    pub category_name: String,
    pub created_by: UserId,
    pub created_by_username: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_available: bool,
    pub average_rating: f64,
}

/// A review left on an item.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub item: ItemId,
    pub user: UserId,
    pub username: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

//! Order and order line item models.

use bazaar_core::{ItemId, OrderId, OrderItemId, OrderStatus, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// An order placed by a user.
///
/// `total_amount` is fixed at creation time from the item prices in effect
/// then; it is never recomputed afterward.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user: UserId,
    pub username: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub shipping_address: String,
    pub total_amount: Decimal,
}

/// A line item within an order.
///
/// `price` is the item's price snapshotted when the order was created,
/// decoupled from any later drift of the item's own price.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub item: ItemId,
    pub item_title: String,
    pub quantity: i32,
    pub price: Decimal,
}

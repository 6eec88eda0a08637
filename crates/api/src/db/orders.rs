//! Order repository for database operations.
//!
//! Order creation is the one multi-row write in the system: the order row
//! and its line items are inserted inside a single transaction, so a failure
//! anywhere leaves no orphaned order or dangling items.

use std::collections::HashMap;

use bazaar_core::{ItemId, OrderId, OrderStatus, UserId};
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use super::RepositoryError;
use crate::models::{Order, OrderItem};

const ORDER_SELECT: &str = r#"
    SELECT o.id, o.user_id AS "user", u.username, o.status,
           o.created_at, o.updated_at, o.shipping_address, o.total_amount
    FROM orders o
    JOIN users u ON u.id = o.user_id
"#;

/// A requested line item: which item, how many.
#[derive(Debug, Clone, Copy)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub quantity: i32,
}

/// Errors specific to the order-creation workflow.
#[derive(Debug, Error)]
pub enum OrderCreateError {
    /// A requested line item references an item that does not exist.
    /// The whole order is rejected; nothing is written.
    #[error("Item with id {0} does not exist")]
    UnknownItem(ItemId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderCreateError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Sum of price × quantity over all line items.
fn order_total(lines: &[(Decimal, i32)]) -> Decimal {
    lines
        .iter()
        .map(|&(price, quantity)| price * Decimal::from(quantity))
        .sum()
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "{ORDER_SELECT} WHERE o.user_id = $1 ORDER BY o.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Get an order by ID, scoped to its owner.
    ///
    /// Another user's order is indistinguishable from a missing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "{ORDER_SELECT} WHERE o.id = $1 AND o.user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// List the line items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT oi.id, oi.item_id AS item, i.title AS item_title, oi.quantity, oi.price
            FROM order_items oi
            JOIN items i ON i.id = oi.item_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Create an order with its line items as a single transaction.
    ///
    /// Every referenced item must exist; `total_amount` is the sum of
    /// current price × quantity over all lines, and each line snapshots the
    /// item's price at this moment. On any failure the transaction rolls
    /// back and nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns `OrderCreateError::UnknownItem` naming the first line item
    /// whose id does not exist. Other failures surface as
    /// `OrderCreateError::Repository`.
    pub async fn create(
        &self,
        user_id: UserId,
        shipping_address: &str,
        lines: &[OrderLine],
    ) -> Result<Order, OrderCreateError> {
        let mut tx = self.pool.begin().await?;

        let ids: Vec<i32> = lines.iter().map(|l| l.item_id.as_i32()).collect();
        let prices: HashMap<i32, Decimal> = sqlx::query_as::<_, (i32, Decimal)>(
            "SELECT id, price FROM items WHERE id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .collect();

        let mut priced: Vec<(Decimal, i32)> = Vec::with_capacity(lines.len());
        for line in lines {
            let price = prices
                .get(&line.item_id.as_i32())
                .copied()
                .ok_or(OrderCreateError::UnknownItem(line.item_id))?;
            priced.push((price, line.quantity));
        }

        let total_amount = order_total(&priced);

        let order_id = sqlx::query_scalar::<_, OrderId>(
            r"
            INSERT INTO orders (user_id, shipping_address, total_amount)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(shipping_address)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        for (line, &(price, _)) in lines.iter().zip(&priced) {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, item_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(line.item_id)
            .bind(line.quantity)
            .bind(price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let order = self.get_for_user(order_id, user_id).await?;
        order.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("order {order_id} disappeared after insert"))
                .into()
        })
    }

    /// Set an order's status, returning the previous status and the updated
    /// order.
    ///
    /// The caller decides what a transition means (this is where the
    /// shipped/delivered notification gating happens).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist or is
    /// not owned by `user_id`. Returns `RepositoryError::Database` for other
    /// database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        user_id: UserId,
        status: OrderStatus,
    ) -> Result<(OrderStatus, Order), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let previous = sqlx::query_scalar::<_, OrderStatus>(
            "SELECT status FROM orders WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let order = self
            .get_for_user(id, user_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok((previous, order))
    }

    /// Delete an order (and, via cascade, its line items), scoped to its
    /// owner.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist
    /// or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_order_total_sums_price_times_quantity() {
        let lines = [(dec("19.99"), 2), (dec("5.00"), 1), (dec("0.50"), 4)];
        assert_eq!(order_total(&lines), dec("46.98"));
    }

    #[test]
    fn test_order_total_empty_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_order_total_exact_decimal_arithmetic() {
        // 0.1 * 3 must be exactly 0.3, not a float approximation
        let lines = [(dec("0.1"), 3)];
        assert_eq!(order_total(&lines), dec("0.3"));
    }
}

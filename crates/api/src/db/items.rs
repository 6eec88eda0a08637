//! Item repository for database operations.
//!
//! Item reads carry denormalized category/creator names and the on-read
//! average rating, so every query here goes through the same joined SELECT.

use bazaar_core::{CategoryId, ItemId, UserId};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Item;

// average_rating recomputes from the full review set on every read; there is
// deliberately no cached aggregate to keep in sync.
const ITEM_SELECT: &str = r#"
    SELECT i.id, i.title, i.description,
           i.category_id AS category, c.name AS category_name,
           i.created_by, u.username AS created_by_username,
           i.price, i.image, i.created_at, i.updated_at, i.is_available,
           COALESCE((SELECT AVG(r.rating)::float8 FROM reviews r WHERE r.item_id = i.id), 0) AS average_rating
    FROM items i
    JOIN categories c ON c.id = i.category_id
    JOIN users u ON u.id = i.created_by
"#;

/// Writable item fields.
#[derive(Debug)]
pub struct ItemFields<'f> {
    pub title: &'f str,
    pub description: &'f str,
    pub category_id: CategoryId,
    pub price: Decimal,
    pub image: Option<&'f str>,
    pub is_available: bool,
}

/// Repository for item database operations.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let items =
            sqlx::query_as::<_, Item>(&format!("{ITEM_SELECT} ORDER BY i.created_at DESC"))
                .fetch_all(self.pool)
                .await?;

        Ok(items)
    }

    /// Get an item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let item = sqlx::query_as::<_, Item>(&format!("{ITEM_SELECT} WHERE i.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(item)
    }

    /// List items created by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_creator(&self, user_id: UserId) -> Result<Vec<Item>, RepositoryError> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "{ITEM_SELECT} WHERE i.created_by = $1 ORDER BY i.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// List items in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Item>, RepositoryError> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "{ITEM_SELECT} WHERE i.category_id = $1 ORDER BY i.created_at DESC"
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Case-insensitive search over title, description, and category name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Item>, RepositoryError> {
        let pattern = format!("%{query}%");
        let items = sqlx::query_as::<_, Item>(&format!(
            r"
            {ITEM_SELECT}
            WHERE i.title ILIKE $1 OR i.description ILIKE $1 OR c.name ILIKE $1
            ORDER BY i.created_at DESC
            "
        ))
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Create an item owned by `created_by`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign-key violation for an unknown category).
    /// Returns `RepositoryError::DataCorruption` if the row cannot be read
    /// back after the insert.
    pub async fn create(
        &self,
        created_by: UserId,
        fields: &ItemFields<'_>,
    ) -> Result<Item, RepositoryError> {
        let id = sqlx::query_scalar::<_, ItemId>(
            r"
            INSERT INTO items (title, description, category_id, created_by, price, image, is_available)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.category_id)
        .bind(created_by)
        .bind(fields.price)
        .bind(fields.image)
        .bind(fields.is_available)
        .fetch_one(self.pool)
        .await?;

        self.get(id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("item {id} disappeared after insert"))
        })
    }

    /// Update an item's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ItemId,
        fields: &ItemFields<'_>,
    ) -> Result<Item, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE items
            SET title = $2, description = $3, category_id = $4, price = $5,
                image = $6, is_available = $7, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.category_id)
        .bind(fields.price)
        .bind(fields.image)
        .bind(fields.is_available)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete an item.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the item is referenced by an
    /// order (order_items restricts the delete).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "item is referenced by existing orders".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

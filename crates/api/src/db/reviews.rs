//! Review repository for database operations.

use bazaar_core::{ItemId, ReviewId, UserId};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Review;

const REVIEW_SELECT: &str = r#"
    SELECT r.id, r.item_id AS item, r.user_id AS "user", u.username,
           r.rating, r.comment, r.created_at
    FROM reviews r
    JOIN users u ON u.id = r.user_id
"#;

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all reviews.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(&format!("{REVIEW_SELECT} ORDER BY r.id"))
            .fetch_all(self.pool)
            .await?;

        Ok(reviews)
    }

    /// Get a review by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(&format!("{REVIEW_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(review)
    }

    /// List reviews for an item, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "{REVIEW_SELECT} WHERE r.item_id = $1 ORDER BY r.created_at DESC"
        ))
        .bind(item_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// Create a review by `user_id` on an item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign-key violation for an unknown item).
    /// Returns `RepositoryError::DataCorruption` if the row cannot be read
    /// back after the insert.
    pub async fn create(
        &self,
        user_id: UserId,
        item_id: ItemId,
        rating: i32,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        let id = sqlx::query_scalar::<_, ReviewId>(
            r"
            INSERT INTO reviews (item_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(item_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(self.pool)
        .await?;

        self.get(id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("review {id} disappeared after insert"))
        })
    }

    /// Update a review's rating and comment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ReviewId,
        rating: i32,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        let result = sqlx::query("UPDATE reviews SET rating = $2, comment = $3 WHERE id = $1")
            .bind(id)
            .bind(rating)
            .bind(comment)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a review.
    ///
    /// # Returns
    ///
    /// Returns `true` if the review was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ReviewId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

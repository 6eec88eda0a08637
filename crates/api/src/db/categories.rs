//! Category repository for database operations.

use bazaar_core::CategoryId;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Category;

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List categories, optionally filtered by a case-insensitive search
    /// over name and description.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Category>, RepositoryError> {
        let categories = match search {
            Some(q) => {
                let pattern = format!("%{q}%");
                sqlx::query_as::<_, Category>(
                    r"
                    SELECT id, name, description, icon
                    FROM categories
                    WHERE name ILIKE $1 OR description ILIKE $1
                    ORDER BY id
                    ",
                )
                .bind(pattern)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Category>(
                    "SELECT id, name, description, icon FROM categories ORDER BY id",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(categories)
    }

    /// Get a category by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, icon FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        icon: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO categories (name, description, icon)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, icon
            ",
        )
        .bind(name)
        .bind(description)
        .bind(icon)
        .fetch_one(self.pool)
        .await?;

        Ok(category)
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CategoryId,
        name: &str,
        description: &str,
        icon: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            UPDATE categories
            SET name = $2, description = $3, icon = $4
            WHERE id = $1
            RETURNING id, name, description, icon
            ",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(icon)
        .fetch_optional(self.pool)
        .await?;

        category.ok_or(RepositoryError::NotFound)
    }

    /// Delete a category.
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category still has items
    /// (items restrict the delete).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "category still has items".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

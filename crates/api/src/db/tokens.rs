//! Auth token repository.
//!
//! Tokens are opaque 40-hex-char strings, one per user, exchanged for
//! credentials at `POST /auth/token` and presented as `Authorization: Bearer`
//! headers afterwards.

use bazaar_core::UserId;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::User;

/// Repository for auth token operations.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Return the user's existing token, or store `candidate` as their token.
    ///
    /// A concurrent insert for the same user loses to the unique constraint
    /// and falls back to reading the winner's token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the queries fail.
    /// Returns `RepositoryError::DataCorruption` if the token row vanished
    /// between the conflict and the re-read.
    pub async fn get_or_create(
        &self,
        user_id: UserId,
        candidate: &str,
    ) -> Result<String, RepositoryError> {
        let token = sqlx::query_scalar::<_, String>(
            r"
            INSERT INTO auth_tokens (token, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING token
            ",
        )
        .bind(candidate)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(token) = token {
            return Ok(token);
        }

        let existing = sqlx::query_scalar::<_, String>(
            "SELECT token FROM auth_tokens WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        existing.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("token for user {user_id} disappeared"))
        })
    }

    /// Resolve a presented token to its user.
    ///
    /// Returns `None` for unknown tokens.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_user(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT u.id, u.username, u.email, u.first_name, u.last_name
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}

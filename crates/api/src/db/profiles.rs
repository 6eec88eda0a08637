//! Profile repository for database operations.

use bazaar_core::{ProfileId, UserId};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Profile;

const PROFILE_SELECT: &str = r#"
    SELECT p.id, p.user_id AS "user", u.username, u.email,
           p.profile_picture, p.bio, p.location, p.date_joined
    FROM profiles p
    JOIN users u ON u.id = p.user_id
"#;

/// Fields a user may set on their own profile.
#[derive(Debug, Default)]
pub struct ProfileFields {
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_picture: Option<String>,
}

/// Repository for profile database operations.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(&format!("{PROFILE_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(profile)
    }

    /// List profiles owned by a user (at most one, but shaped as a list).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Profile>, RepositoryError> {
        let profiles =
            sqlx::query_as::<_, Profile>(&format!("{PROFILE_SELECT} WHERE p.user_id = $1"))
                .bind(user_id)
                .fetch_all(self.pool)
                .await?;

        Ok(profiles)
    }

    /// Get the user's profile, creating an empty one if it is missing.
    ///
    /// Registration already provisions a profile; this is the lazy fallback
    /// used at token issuance and `/profiles/me`, so a missing profile is
    /// healed before it can be observed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the queries fail.
    /// Returns `RepositoryError::DataCorruption` if the profile cannot be
    /// read back after the upsert.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Profile, RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;

        let profile =
            sqlx::query_as::<_, Profile>(&format!("{PROFILE_SELECT} WHERE p.user_id = $1"))
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

        profile.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("profile for user {user_id} disappeared"))
        })
    }

    /// Create a profile for a user with the given fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a profile.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        fields: &ProfileFields,
    ) -> Result<Profile, RepositoryError> {
        let id = sqlx::query_scalar::<_, ProfileId>(
            r"
            INSERT INTO profiles (user_id, bio, location, profile_picture)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(fields.bio.as_deref())
        .bind(fields.location.as_deref())
        .bind(fields.profile_picture.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("user already has a profile".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        self.get(id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("profile {id} disappeared after insert"))
        })
    }

    /// Update a profile's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProfileId,
        fields: &ProfileFields,
    ) -> Result<Profile, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE profiles
            SET bio = $2, location = $3, profile_picture = $4
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(fields.bio.as_deref())
        .bind(fields.location.as_deref())
        .bind(fields.profile_picture.as_deref())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a profile.
    ///
    /// # Returns
    ///
    /// Returns `true` if the profile was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProfileId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

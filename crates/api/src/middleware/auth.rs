//! Authentication extractor.
//!
//! Resolves `Authorization: Bearer <token>` headers to the owning user.
//! Handlers that take a [`CurrentUser`] argument reject unauthenticated
//! requests with 401 before the handler body runs.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::db::TokenRepository;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Extractor for the authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
///     Json(user)
/// }
/// ```
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_owned()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("expected a Bearer token".to_owned()))?;

        let user = TokenRepository::new(state.pool())
            .get_user(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid token".to_owned()))?;

        Ok(Self(user))
    }
}

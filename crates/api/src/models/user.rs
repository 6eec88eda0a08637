//! User account model.

use bazaar_core::{Email, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A marketplace user account.
///
/// The password hash never leaves the repository layer; it is not part of
/// this struct.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
}

//! Domain models for marketplace entities.
//!
//! These structs are both the database row shape (via `sqlx::FromRow`, with
//! SQL column aliases where the wire name differs) and the JSON wire shape
//! (via serde). Denormalized read-only fields like `username` and
//! `category_name` are filled by joins in the repositories.

pub mod catalog;
pub mod notification;
pub mod order;
pub mod profile;
pub mod user;

pub use catalog::{Category, Item, Review};
pub use notification::Notification;
pub use order::{Order, OrderItem};
pub use profile::Profile;
pub use user::User;

//! Domain services that sit between route handlers and repositories.

pub mod auth;
pub mod events;

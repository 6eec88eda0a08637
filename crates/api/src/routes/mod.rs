//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                - Health check
//!
//! # Auth
//! POST   /auth/token                            - Exchange credentials for a token
//!
//! # Users
//! POST   /users                                 - Register a new user
//! GET    /users                                 - List users
//! GET    /users/me                              - Authenticated user
//! GET    /users/{id}                            - User detail
//! PUT    /users/{id}                            - Update user (auth)
//! DELETE /users/{id}                            - Delete user (auth)
//!
//! # Profiles (auth)
//! GET    /profiles                              - Authenticated user's profiles
//! POST   /profiles                              - Create profile
//! GET    /profiles/me                           - Get-or-create own profile
//! GET    /profiles/{id}                         - Profile detail
//! PUT    /profiles/{id}                         - Update profile
//! DELETE /profiles/{id}                         - Delete profile
//!
//! # Categories (reads public, writes auth)
//! GET    /categories?search=                    - List/search categories
//! POST   /categories                            - Create category
//! GET    /categories/{id}                       - Category detail
//! PUT    /categories/{id}                       - Update category
//! DELETE /categories/{id}                       - Delete category
//!
//! # Items (reads public, writes auth + creator-only)
//! GET    /items                                 - List items
//! POST   /items                                 - Create item
//! GET    /items/my_items                        - Authenticated user's items
//! GET    /items/by_category?category_id=        - Items in a category
//! GET    /items/search?q=                       - Search items
//! GET    /items/{id}                            - Item detail with reviews
//! PUT    /items/{id}                            - Update item
//! DELETE /items/{id}                            - Delete item
//!
//! # Reviews (reads public, writes auth + author-only)
//! GET    /reviews                               - List reviews
//! POST   /reviews                               - Create review
//! GET    /reviews/for_item?item_id=             - Reviews for an item
//! GET    /reviews/{id}                          - Review detail
//! PUT    /reviews/{id}                          - Update review
//! DELETE /reviews/{id}                          - Delete review
//!
//! # Orders (auth, owner-scoped)
//! GET    /orders                                - Authenticated user's orders
//! POST   /orders                                - Create order with line items
//! GET    /orders/{id}                           - Order detail with line items
//! DELETE /orders/{id}                           - Delete order
//! PATCH  /orders/{id}/update_status             - Set order status
//!
//! # Notifications (auth, owner-scoped)
//! GET    /notifications                         - Authenticated user's notifications
//! GET    /notifications/{id}                    - Notification detail
//! PATCH  /notifications/{id}/mark_as_read       - Mark one read
//! PATCH  /notifications/mark_all_as_read        - Mark all read
//! ```

pub mod auth;
pub mod categories;
pub mod items;
pub mod notifications;
pub mod orders;
pub mod profiles;
pub mod reviews;
pub mod users;

use axum::{
    Json, Router,
    routing::{get, patch, post},
};
use serde_json::{Value, json};

use crate::state::AppState;

/// Liveness probe.
async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::register))
        .route("/me", get(users::me))
        .route(
            "/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profiles::list).post(profiles::create))
        .route("/me", get(profiles::me))
        .route(
            "/{id}",
            get(profiles::get)
                .put(profiles::update)
                .delete(profiles::delete),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
}

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list).post(items::create))
        .route("/my_items", get(items::my_items))
        .route("/by_category", get(items::by_category))
        .route("/search", get(items::search))
        .route(
            "/{id}",
            get(items::get).put(items::update).delete(items::delete),
        )
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::list).post(reviews::create))
        .route("/for_item", get(reviews::for_item))
        .route(
            "/{id}",
            get(reviews::get)
                .put(reviews::update)
                .delete(reviews::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::get).delete(orders::delete))
        .route("/{id}/update_status", patch(orders::update_status))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list))
        .route("/mark_all_as_read", patch(notifications::mark_all_as_read))
        .route("/{id}", get(notifications::get))
        .route("/{id}/mark_as_read", patch(notifications::mark_as_read))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/token", post(auth::obtain_token))
        .nest("/users", user_routes())
        .nest("/profiles", profile_routes())
        .nest("/categories", category_routes())
        .nest("/items", item_routes())
        .nest("/reviews", review_routes())
        .nest("/orders", order_routes())
        .nest("/notifications", notification_routes())
}

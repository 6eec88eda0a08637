//! Integration tests for Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p bazaar-cli -- migrate
//!
//! # Start the API server
//! cargo run -p bazaar-api
//!
//! # Run the (ignored-by-default) integration tests
//! cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! Each test registers its own throwaway user so tests can run against a
//! shared database without stepping on each other.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BAZAAR_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// A registered user and their bearer token.
pub struct TestUser {
    pub token: String,
    pub user_id: i64,
    pub username: String,
}

/// Register a fresh user with a unique username and return their token.
///
/// # Panics
///
/// Panics if the request fails or the response is not the expected shape.
pub async fn register_user(client: &Client) -> TestUser {
    let username = format!("it-{}", Uuid::new_v4());
    let resp = client
        .post(format!("{}/users", base_url()))
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "integration-test-password",
        }))
        .send()
        .await
        .expect("Failed to register user");

    assert_eq!(resp.status(), 201, "registration should return 201");
    let body: Value = resp.json().await.expect("Failed to parse registration");

    TestUser {
        token: body["token"].as_str().expect("token in response").to_string(),
        user_id: body["user_id"].as_i64().expect("user_id in response"),
        username,
    }
}

/// Create a category and return its id.
///
/// # Panics
///
/// Panics if the request fails or the response is not the expected shape.
pub async fn create_category(client: &Client, token: &str, name: &str) -> i64 {
    let resp = client
        .post(format!("{}/categories", base_url()))
        .bearer_auth(token)
        .json(&json!({"name": name, "description": "integration test category"}))
        .send()
        .await
        .expect("Failed to create category");

    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("Failed to parse category");
    body["id"].as_i64().expect("category id")
}

/// Create an item in a category and return its id.
///
/// # Panics
///
/// Panics if the request fails or the response is not the expected shape.
pub async fn create_item(
    client: &Client,
    token: &str,
    category_id: i64,
    title: &str,
    price: &str,
) -> i64 {
    let resp = client
        .post(format!("{}/items", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "description": "integration test item",
            "category": category_id,
            "price": price,
        }))
        .send()
        .await
        .expect("Failed to create item");

    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("Failed to parse item");
    body["id"].as_i64().expect("item id")
}

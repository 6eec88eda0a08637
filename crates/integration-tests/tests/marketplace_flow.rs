//! Integration tests for the core marketplace flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p bazaar-api)
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use bazaar_integration_tests::{base_url, create_category, create_item, register_user};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

// ============================================================================
// Registration & Auth Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_issues_token_and_profile() {
    let client = Client::new();
    let user = register_user(&client).await;

    assert!(!user.token.is_empty());

    // The registration transaction also provisioned a profile
    let resp = client
        .get(format!("{}/profiles/me", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to get own profile");

    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(profile["user"].as_i64(), Some(user.user_id));
    assert_eq!(profile["username"].as_str(), Some(user.username.as_str()));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_username_is_rejected() {
    let client = Client::new();
    let user = register_user(&client).await;

    let resp = client
        .post(format!("{}/users", base_url()))
        .json(&json!({
            "username": user.username,
            "email": "other@example.com",
            "password": "some-password",
        }))
        .send()
        .await
        .expect("Failed to send duplicate registration");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_token_endpoint_checks_credentials() {
    let client = Client::new();
    let user = register_user(&client).await;

    // Wrong password
    let resp = client
        .post(format!("{}/auth/token", base_url()))
        .json(&json!({"username": user.username, "password": "wrong"}))
        .send()
        .await
        .expect("Failed to send token request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Right password returns the same token the registration issued
    let resp = client
        .post(format!("{}/auth/token", base_url()))
        .json(&json!({
            "username": user.username,
            "password": "integration-test-password",
        }))
        .send()
        .await
        .expect("Failed to send token request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse token response");
    assert_eq!(body["token"].as_str(), Some(user.token.as_str()));
    assert_eq!(body["user_id"].as_i64(), Some(user.user_id));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_protected_route_rejects_bad_tokens() {
    let client = Client::new();

    // No header at all
    let resp = client
        .get(format!("{}/orders", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let resp = client
        .get(format!("{}/orders", base_url()))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Category Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_category_search_filter() {
    let client = Client::new();
    let user = register_user(&client).await;

    let marker = Uuid::new_v4().simple().to_string();
    let name = format!("Vintage {marker}");
    create_category(&client, &user.token, &name).await;

    let resp = client
        .get(format!("{}/categories?search={marker}", base_url()))
        .send()
        .await
        .expect("Failed to search categories");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse categories");
    let categories = body.as_array().expect("array of categories");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"].as_str(), Some(name.as_str()));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_category_writes_require_auth() {
    let client = Client::new();

    let resp = client
        .post(format!("{}/categories", base_url()))
        .json(&json!({"name": "Unauthorized"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_delete_category_with_items_conflicts() {
    let client = Client::new();
    let user = register_user(&client).await;
    let category = create_category(&client, &user.token, "Occupied").await;
    create_item(&client, &user.token, category, "Occupying item", "1.00").await;

    let resp = client
        .delete(format!("{}/categories/{category}", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The category survived
    let resp = client
        .get(format!("{}/categories/{category}", base_url()))
        .send()
        .await
        .expect("Failed to get category");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Item Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_item_detail_includes_reviews_and_rating() {
    let client = Client::new();
    let seller = register_user(&client).await;
    let category = create_category(&client, &seller.token, "Rated goods").await;
    let item = create_item(&client, &seller.token, category, "Rated item", "10.00").await;

    // No reviews yet: average_rating is 0
    let resp = client
        .get(format!("{}/items/{item}", base_url()))
        .send()
        .await
        .expect("Failed to get item");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse item");
    assert_eq!(body["average_rating"].as_f64(), Some(0.0));
    assert_eq!(body["reviews"].as_array().map(Vec::len), Some(0));

    // Two reviews from two buyers: 3 and 5 average to 4
    for (rating, buyer) in [(3, register_user(&client).await), (5, register_user(&client).await)] {
        let resp = client
            .post(format!("{}/reviews", base_url()))
            .bearer_auth(&buyer.token)
            .json(&json!({"item": item, "rating": rating, "comment": "ok"}))
            .send()
            .await
            .expect("Failed to create review");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client
        .get(format!("{}/items/{item}", base_url()))
        .send()
        .await
        .expect("Failed to get item");
    let body: Value = resp.json().await.expect("Failed to parse item");
    assert_eq!(body["average_rating"].as_f64(), Some(4.0));
    assert_eq!(body["reviews"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_item_search_requires_query() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/items/search", base_url()))
        .send()
        .await
        .expect("Failed to send search request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"].as_str(), Some("Search query is required"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_by_category_requires_category_id() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/items/by_category", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"].as_str(), Some("Category ID is required"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_only_creator_may_modify_item() {
    let client = Client::new();
    let seller = register_user(&client).await;
    let intruder = register_user(&client).await;
    let category = create_category(&client, &seller.token, "Owned goods").await;
    let item = create_item(&client, &seller.token, category, "Owned item", "5.00").await;

    let resp = client
        .put(format!("{}/items/{item}", base_url()))
        .bearer_auth(&intruder.token)
        .json(&json!({
            "title": "Hijacked",
            "category": category,
            "price": "1.00",
        }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .delete(format!("{}/items/{item}", base_url()))
        .bearer_auth(&intruder.token)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_my_items_is_scoped_to_creator() {
    let client = Client::new();
    let seller = register_user(&client).await;
    let other = register_user(&client).await;
    let category = create_category(&client, &seller.token, "Mine").await;
    create_item(&client, &seller.token, category, "My item", "2.50").await;

    let resp = client
        .get(format!("{}/items/my_items", base_url()))
        .bearer_auth(&other.token)
        .send()
        .await
        .expect("Failed to list items");
    let body: Value = resp.json().await.expect("Failed to parse items");
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let resp = client
        .get(format!("{}/items/my_items", base_url()))
        .bearer_auth(&seller.token)
        .send()
        .await
        .expect("Failed to list items");
    let body: Value = resp.json().await.expect("Failed to parse items");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

// ============================================================================
// Review Validation Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_review_rating_must_be_in_range() {
    let client = Client::new();
    let user = register_user(&client).await;
    let category = create_category(&client, &user.token, "Reviewable").await;
    let item = create_item(&client, &user.token, category, "Reviewable item", "1.00").await;

    for rating in [0, 6] {
        let resp = client
            .post(format!("{}/reviews", base_url()))
            .bearer_auth(&user.token)
            .json(&json!({"item": item, "rating": rating}))
            .send()
            .await
            .expect("Failed to send review");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "rating {rating}");
    }
}

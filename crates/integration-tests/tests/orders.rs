//! Integration tests for orders and notifications.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p bazaar-api)
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use bazaar_integration_tests::{base_url, create_category, create_item, register_user};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn place_order(client: &Client, token: &str, items: Value) -> Value {
    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "shipping_address": "1 Integration Way",
            "items": items,
        }))
        .send()
        .await
        .expect("Failed to create order");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse order")
}

async fn set_status(client: &Client, token: &str, order_id: i64, status: &str) -> reqwest::Response {
    client
        .patch(format!("{}/orders/{order_id}/update_status", base_url()))
        .bearer_auth(token)
        .json(&json!({"status": status}))
        .send()
        .await
        .expect("Failed to send status update")
}

async fn notifications(client: &Client, token: &str) -> Vec<Value> {
    let resp = client
        .get(format!("{}/notifications", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to list notifications");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse notifications");
    body.as_array().expect("array of notifications").clone()
}

// ============================================================================
// Order Creation Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_total_and_line_items() {
    let client = Client::new();
    let user = register_user(&client).await;
    let category = create_category(&client, &user.token, "Orderable").await;
    let keyboard = create_item(&client, &user.token, category, "Keyboard", "89.99").await;
    let hub = create_item(&client, &user.token, category, "Hub", "34.50").await;

    let order = place_order(
        &client,
        &user.token,
        json!([
            {"item_id": keyboard, "quantity": 2},
            {"item_id": hub, "quantity": 1},
        ]),
    )
    .await;

    // 2 * 89.99 + 34.50 = 214.48
    assert_eq!(order["total_amount"].as_str(), Some("214.48"));
    assert_eq!(order["status"].as_str(), Some("pending"));

    let items = order["items"].as_array().expect("line items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["item_title"].as_str(), Some("Keyboard"));
    assert_eq!(items[0]["price"].as_str(), Some("89.99"));
    assert_eq!(items[0]["quantity"].as_i64(), Some(2));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_line_quantity_defaults_to_one() {
    let client = Client::new();
    let user = register_user(&client).await;
    let category = create_category(&client, &user.token, "Defaulted").await;
    let item = create_item(&client, &user.token, category, "Single item", "12.25").await;

    // No quantity on the line item
    let order = place_order(&client, &user.token, json!([{"item_id": item}])).await;

    assert_eq!(order["total_amount"].as_str(), Some("12.25"));
    let items = order["items"].as_array().expect("line items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"].as_i64(), Some(1));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_with_unknown_item_is_rejected_whole() {
    let client = Client::new();
    let user = register_user(&client).await;
    let category = create_category(&client, &user.token, "Partial").await;
    let real = create_item(&client, &user.token, category, "Real item", "5.00").await;

    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(&user.token)
        .json(&json!({
            "shipping_address": "1 Integration Way",
            "items": [
                {"item_id": real, "quantity": 1},
                {"item_id": 999_999_999, "quantity": 1},
            ],
        }))
        .send()
        .await
        .expect("Failed to send order");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(
        body["error"].as_str(),
        Some("Item with id 999999999 does not exist")
    );

    // The whole order rolled back; nothing was persisted
    let resp = client
        .get(format!("{}/orders", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to list orders");
    let body: Value = resp.json().await.expect("Failed to parse orders");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_validation() {
    let client = Client::new();
    let user = register_user(&client).await;
    let category = create_category(&client, &user.token, "Validated").await;
    let item = create_item(&client, &user.token, category, "Validated item", "5.00").await;

    // Empty shipping address
    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(&user.token)
        .json(&json!({"shipping_address": "  ", "items": [{"item_id": item, "quantity": 1}]}))
        .send()
        .await
        .expect("Failed to send order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // No line items
    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(&user.token)
        .json(&json!({"shipping_address": "1 Way", "items": []}))
        .send()
        .await
        .expect("Failed to send order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Zero quantity
    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(&user.token)
        .json(&json!({"shipping_address": "1 Way", "items": [{"item_id": item, "quantity": 0}]}))
        .send()
        .await
        .expect("Failed to send order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_orders_are_owner_scoped() {
    let client = Client::new();
    let owner = register_user(&client).await;
    let other = register_user(&client).await;
    let category = create_category(&client, &owner.token, "Private").await;
    let item = create_item(&client, &owner.token, category, "Private item", "5.00").await;

    let order = place_order(&client, &owner.token, json!([{"item_id": item, "quantity": 1}])).await;
    let order_id = order["id"].as_i64().expect("order id");

    // Another user can't see, mutate, or delete it
    let resp = client
        .get(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&other.token)
        .send()
        .await
        .expect("Failed to get order");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = set_status(&client, &other.token, order_id, "shipped").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .delete(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&other.token)
        .send()
        .await
        .expect("Failed to delete order");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_delete_ordered_item_conflicts() {
    let client = Client::new();
    let user = register_user(&client).await;
    let category = create_category(&client, &user.token, "Committed").await;
    let item = create_item(&client, &user.token, category, "Committed item", "5.00").await;

    place_order(&client, &user.token, json!([{"item_id": item, "quantity": 1}])).await;

    // The order's line item pins the listing
    let resp = client
        .delete(format!("{}/items/{item}", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = client
        .get(format!("{}/items/{item}", base_url()))
        .send()
        .await
        .expect("Failed to get item");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Status & Notification Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_shipped_notification_fires_once_per_transition() {
    let client = Client::new();
    let user = register_user(&client).await;
    let category = create_category(&client, &user.token, "Shippable").await;
    let item = create_item(&client, &user.token, category, "Shippable item", "5.00").await;

    let order = place_order(&client, &user.token, json!([{"item_id": item, "quantity": 1}])).await;
    let order_id = order["id"].as_i64().expect("order id");

    assert_eq!(notifications(&client, &user.token).await.len(), 0);

    // pending -> shipped notifies
    let resp = set_status(&client, &user.token, order_id, "shipped").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let notes = notifications(&client, &user.token).await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"].as_str(), Some("Order Shipped"));
    assert_eq!(
        notes[0]["message"].as_str(),
        Some(format!("Your order #{order_id} has been shipped!").as_str())
    );
    assert_eq!(notes[0]["is_read"].as_bool(), Some(false));

    // shipped -> shipped again is a no-op, no duplicate
    let resp = set_status(&client, &user.token, order_id, "shipped").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(notifications(&client, &user.token).await.len(), 1);

    // shipped -> delivered notifies again
    let resp = set_status(&client, &user.token, order_id, "delivered").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let notes = notifications(&client, &user.token).await;
    assert_eq!(notes.len(), 2);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_invalid_status_is_rejected_and_row_unchanged() {
    let client = Client::new();
    let user = register_user(&client).await;
    let category = create_category(&client, &user.token, "Unchanging").await;
    let item = create_item(&client, &user.token, category, "Unchanging item", "5.00").await;

    let order = place_order(&client, &user.token, json!([{"item_id": item, "quantity": 1}])).await;
    let order_id = order["id"].as_i64().expect("order id");

    let resp = set_status(&client, &user.token, order_id, "teleported").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"].as_str(), Some("Invalid status"));

    let resp = client
        .get(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to get order");
    let body: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(body["status"].as_str(), Some("pending"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_mark_notifications_read_is_user_scoped() {
    let client = Client::new();
    let user = register_user(&client).await;
    let bystander = register_user(&client).await;
    let category = create_category(&client, &user.token, "Readable").await;
    let item = create_item(&client, &user.token, category, "Readable item", "5.00").await;

    // Generate a notification for each user
    for token in [&user.token, &bystander.token] {
        let order = place_order(&client, token, json!([{"item_id": item, "quantity": 1}])).await;
        let order_id = order["id"].as_i64().expect("order id");
        let resp = set_status(&client, token, order_id, "shipped").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // Mark one of the user's notifications read individually
    let notes = notifications(&client, &user.token).await;
    let note_id = notes[0]["id"].as_i64().expect("notification id");
    let resp = client
        .patch(format!(
            "{}/notifications/{note_id}/mark_as_read",
            base_url()
        ))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to mark as read");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body["status"].as_str(),
        Some("notification marked as read")
    );

    // The bystander can't touch the user's notification
    let resp = client
        .patch(format!(
            "{}/notifications/{note_id}/mark_as_read",
            base_url()
        ))
        .bearer_auth(&bystander.token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // mark_all_as_read only flips the caller's rows
    let resp = client
        .patch(format!("{}/notifications/mark_all_as_read", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to mark all as read");
    assert_eq!(resp.status(), StatusCode::OK);

    let notes = notifications(&client, &user.token).await;
    assert!(notes.iter().all(|n| n["is_read"] == json!(true)));

    let notes = notifications(&client, &bystander.token).await;
    assert!(notes.iter().all(|n| n["is_read"] == json!(false)));
}

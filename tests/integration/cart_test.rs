//! Integration tests for the shopping cart.

use http::StatusCode;
use uuid::Uuid;

use urpearl_entity::Role;

use crate::helpers::TestApp;

#[tokio::test]
async fn cart_requires_authentication() {
    let app = TestApp::without_database();

    let response = app.request("GET", "/api/cart", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn add_item_rejects_a_zero_quantity() {
    let app = TestApp::without_database();
    let buyer = crate::helpers::make_user("window-shopper", Role::Buyer);
    let token = app.token_for(&buyer);

    let response = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({
                "product_id": Uuid::new_v4(),
                "quantity": 0,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "VALIDATION");
    assert!(response.body["details"].is_object());
}

#[tokio::test]
async fn update_item_rejects_a_malformed_id() {
    let app = TestApp::without_database();
    let buyer = crate::helpers::make_user("fat-fingers", Role::Buyer);
    let token = app.token_for(&buyer);

    let response = app
        .request(
            "PUT",
            "/api/cart/items/not-a-uuid",
            Some(serde_json::json!({ "quantity": 2 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "VALIDATION");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn added_items_show_up_with_totals() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("cart-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Pearl Stud Earrings", "pearl-stud-earrings", "149.50", 10)
        .await;

    let added = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({ "product_id": product_id, "quantity": 2 })),
            Some(&token),
        )
        .await;
    assert_eq!(added.status, StatusCode::OK, "{:?}", added.body);

    let cart = app.request("GET", "/api/cart", None, Some(&token)).await;

    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.body["data"]["item_count"], 2);
    assert_eq!(cart.body["data"]["total"], "299.00");
    assert_eq!(cart.body["data"]["lines"][0]["quantity"], 2);
    assert_eq!(
        cart.body["data"]["lines"][0]["product_name"],
        "Pearl Stud Earrings"
    );

    let summary = app
        .request("GET", "/api/cart/summary", None, Some(&token))
        .await;
    assert_eq!(summary.status, StatusCode::OK);
    assert_eq!(summary.body["data"]["item_count"], 2);
    assert_eq!(summary.body["data"]["total"], "299.00");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn repeat_adds_merge_into_one_line() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("repeat-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Freshwater Bracelet", "freshwater-bracelet", "85.00", 10)
        .await;

    for quantity in [2, 3] {
        let added = app
            .request(
                "POST",
                "/api/cart/items",
                Some(serde_json::json!({ "product_id": product_id, "quantity": quantity })),
                Some(&token),
            )
            .await;
        assert_eq!(added.status, StatusCode::OK, "{:?}", added.body);
    }

    let cart = app.request("GET", "/api/cart", None, Some(&token)).await;

    let lines = cart.body["data"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 5);
    assert_eq!(cart.body["data"]["item_count"], 5);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn adding_beyond_stock_is_rejected() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("greedy-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Baroque Pendant", "baroque-pendant", "500.00", 10)
        .await;

    let response = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({ "product_id": product_id, "quantity": 11 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "INSUFFICIENT_STOCK");

    // The cap applies to the cumulative carted quantity, not each call.
    let first = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({ "product_id": product_id, "quantity": 6 })),
            Some(&token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({ "product_id": product_id, "quantity": 5 })),
            Some(&token),
        )
        .await;
    assert_eq!(second.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(second.body["error"], "INSUFFICIENT_STOCK");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn updating_quantity_to_zero_removes_the_line() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("undecided-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Keshi Bracelet", "keshi-bracelet", "320.00", 5)
        .await;

    let added = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({ "product_id": product_id, "quantity": 2 })),
            Some(&token),
        )
        .await;
    let item_id = added.body["data"]["id"].as_str().unwrap().to_string();

    let updated = app
        .request(
            "PUT",
            &format!("/api/cart/items/{item_id}"),
            Some(serde_json::json!({ "quantity": 0 })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert!(updated.body["data"].is_null());

    let cart = app.request("GET", "/api/cart", None, Some(&token)).await;
    assert_eq!(cart.body["data"]["item_count"], 0);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn clearing_the_cart_reports_removed_lines() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("clearing-buyer", Role::Buyer).await;
    let first = app
        .seed_product("Akoya Strand", "akoya-strand", "1500.00", 4)
        .await;
    let second = app
        .seed_product("Shell Brooch", "shell-brooch", "75.00", 4)
        .await;

    for product_id in [first, second] {
        let response = app
            .request(
                "POST",
                "/api/cart/items",
                Some(serde_json::json!({ "product_id": product_id, "quantity": 1 })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let cleared = app.request("DELETE", "/api/cart", None, Some(&token)).await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert_eq!(cleared.body["data"]["count"], 2);

    let cart = app.request("GET", "/api/cart", None, Some(&token)).await;
    assert_eq!(cart.body["data"]["item_count"], 0);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn validate_flags_lines_that_outgrew_stock() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("stale-cart-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Tahitian Ring", "tahitian-ring", "890.00", 3)
        .await;

    let added = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({ "product_id": product_id, "quantity": 3 })),
            Some(&token),
        )
        .await;
    assert_eq!(added.status, StatusCode::OK);

    // Stock drains behind the buyer's back.
    sqlx::query("UPDATE inventories SET quantity = 1 WHERE product_id = $1")
        .bind(product_id)
        .execute(&app.db_pool)
        .await
        .expect("Failed to drain stock");

    let validation = app
        .request("GET", "/api/cart/validate", None, Some(&token))
        .await;

    assert_eq!(validation.status, StatusCode::OK);
    assert_eq!(validation.body["data"]["valid"], false);
    assert_eq!(validation.body["data"]["problems"].as_array().unwrap().len(), 1);
}

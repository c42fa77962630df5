//! Integration tests for checkout, payment confirmation and orders.

use http::StatusCode;

use urpearl_entity::Role;
use urpearl_payment::MockBehavior;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn checkout_rejects_an_incomplete_address() {
    let app = TestApp::without_database();
    let buyer = helpers::make_user("hasty-buyer", Role::Buyer);
    let token = app.token_for(&buyer);

    let response = app
        .request(
            "POST",
            "/api/checkout",
            Some(serde_json::json!({
                "payment_intent_id": "",
                "shipping_address": {
                    "name": "",
                    "line1": "",
                    "city": "",
                    "state": "",
                    "postal_code": "",
                    "country": "",
                },
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "VALIDATION");
    assert!(response.body["details"].is_object());
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn checkout_settles_payment_and_commits_stock() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("checkout-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Classic Strand", "classic-strand", "100.00", 10)
        .await;

    let added = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({ "product_id": product_id, "quantity": 2 })),
            Some(&token),
        )
        .await;
    assert_eq!(added.status, StatusCode::OK);

    let intent = app
        .request("POST", "/api/checkout/intent", None, Some(&token))
        .await;
    assert_eq!(intent.status, StatusCode::OK, "{:?}", intent.body);
    assert_eq!(intent.body["data"]["amount"], "200.00");
    assert_eq!(intent.body["data"]["currency"], "php");
    let intent_id = intent.body["data"]["payment_intent_id"]
        .as_str()
        .unwrap()
        .to_string();

    let placed = app
        .request(
            "POST",
            "/api/checkout",
            Some(serde_json::json!({
                "payment_intent_id": intent_id,
                "shipping_address": helpers::shipping_address(),
            })),
            Some(&token),
        )
        .await;

    assert_eq!(placed.status, StatusCode::OK, "{:?}", placed.body);
    assert_eq!(placed.body["data"]["status"], "paid");
    assert_eq!(placed.body["data"]["total_amount"], "200.00");
    assert_eq!(placed.body["data"]["items"][0]["quantity"], 2);
    assert_eq!(placed.body["data"]["items"][0]["unit_price"], "100.00");

    assert_eq!(app.inventory_quantity(product_id).await, 8);

    let cart = app.request("GET", "/api/cart", None, Some(&token)).await;
    assert_eq!(cart.body["data"]["item_count"], 0);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn checkout_intent_refuses_an_empty_cart() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("empty-cart-buyer", Role::Buyer).await;

    let response = app
        .request("POST", "/api/checkout/intent", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "EMPTY_CART");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn declined_payment_leaves_stock_and_cart_untouched() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("declined-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Drop Earrings", "drop-earrings", "260.00", 10)
        .await;

    let added = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({ "product_id": product_id, "quantity": 2 })),
            Some(&token),
        )
        .await;
    assert_eq!(added.status, StatusCode::OK);

    let intent = app
        .request("POST", "/api/checkout/intent", None, Some(&token))
        .await;
    let intent_id = intent.body["data"]["payment_intent_id"]
        .as_str()
        .unwrap()
        .to_string();

    app.payments.set_behavior(MockBehavior::Decline);

    let response = app
        .request(
            "POST",
            "/api/checkout",
            Some(serde_json::json!({
                "payment_intent_id": intent_id,
                "shipping_address": helpers::shipping_address(),
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(response.body["error"], "PAYMENT_FAILED");

    assert_eq!(app.inventory_quantity(product_id).await, 10);
    let cart = app.request("GET", "/api/cart", None, Some(&token)).await;
    assert_eq!(cart.body["data"]["item_count"], 2);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn checkout_with_an_unknown_intent_fails_payment() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("phantom-intent", Role::Buyer).await;
    let product_id = app
        .seed_product("Coin Pearl Hairpin", "coin-pearl-hairpin", "55.00", 3)
        .await;

    let added = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({ "product_id": product_id, "quantity": 1 })),
            Some(&token),
        )
        .await;
    assert_eq!(added.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            "/api/checkout",
            Some(serde_json::json!({
                "payment_intent_id": "pi_mock_does_not_exist",
                "shipping_address": helpers::shipping_address(),
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(response.body["error"], "PAYMENT_FAILED");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn cancelling_an_order_restores_stock_exactly_once() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("cancelling-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Twin Pearl Band", "twin-pearl-band", "150.00", 10)
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

    let intent = app
        .request("POST", "/api/checkout/intent", None, Some(&token))
        .await;
    let intent_id = intent.body["data"]["payment_intent_id"]
        .as_str()
        .unwrap()
        .to_string();

    let placed = app
        .request(
            "POST",
            "/api/checkout",
            Some(serde_json::json!({
                "payment_intent_id": intent_id,
                "shipping_address": helpers::shipping_address(),
            })),
            Some(&token),
        )
        .await;
    assert_eq!(placed.status, StatusCode::OK);
    let order_id = placed.body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(app.inventory_quantity(product_id).await, 7);

    let cancelled = app
        .request(
            "POST",
            &format!("/api/orders/{order_id}/cancel"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK, "{:?}", cancelled.body);
    assert_eq!(cancelled.body["data"]["status"], "cancelled");
    assert_eq!(app.inventory_quantity(product_id).await, 10);

    let again = app
        .request(
            "POST",
            &format!("/api/orders/{order_id}/cancel"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(app.inventory_quantity(product_id).await, 10);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn a_shipped_order_cannot_be_cancelled() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("dispatch-admin", Role::Admin).await;
    let (_, buyer_token) = app.create_test_user("dispatch-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Keshi Choker", "keshi-choker", "310.00", 10)
        .await;
    let order_id = app.place_order(&buyer_token, product_id, 1).await;

    let shipped = app
        .request(
            "PUT",
            &format!("/api/admin/orders/{order_id}/status"),
            Some(serde_json::json!({ "status": "shipped" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(shipped.status, StatusCode::OK, "{:?}", shipped.body);

    let cancelled = app
        .request(
            "POST",
            &format!("/api/orders/{order_id}/cancel"),
            None,
            Some(&buyer_token),
        )
        .await;

    assert_eq!(cancelled.status, StatusCode::CONFLICT);
    assert_eq!(cancelled.body["error"], "CONFLICT");
    assert_eq!(app.inventory_quantity(product_id).await, 9);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn orders_are_scoped_to_their_owner() {
    let app = TestApp::new().await;
    let (_, owner_token) = app.create_test_user("order-owner", Role::Buyer).await;
    let (_, other_token) = app.create_test_user("other-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Gift Voucher Shell", "gift-voucher-shell", "10.00", 5)
        .await;

    let added = app
        .request(
            "POST",
            "/api/cart/items",
            Some(serde_json::json!({ "product_id": product_id, "quantity": 1 })),
            Some(&owner_token),
        )
        .await;
    assert_eq!(added.status, StatusCode::OK);

    let intent = app
        .request("POST", "/api/checkout/intent", None, Some(&owner_token))
        .await;
    let intent_id = intent.body["data"]["payment_intent_id"]
        .as_str()
        .unwrap()
        .to_string();
    let placed = app
        .request(
            "POST",
            "/api/checkout",
            Some(serde_json::json!({
                "payment_intent_id": intent_id,
                "shipping_address": helpers::shipping_address(),
            })),
            Some(&owner_token),
        )
        .await;
    let order_id = placed.body["data"]["id"].as_str().unwrap().to_string();

    let own_list = app
        .request("GET", "/api/orders", None, Some(&owner_token))
        .await;
    assert_eq!(own_list.body["data"]["total_items"], 1);

    let foreign_list = app
        .request("GET", "/api/orders", None, Some(&other_token))
        .await;
    assert_eq!(foreign_list.body["data"]["total_items"], 0);

    let foreign_get = app
        .request(
            "GET",
            &format!("/api/orders/{order_id}"),
            None,
            Some(&other_token),
        )
        .await;
    assert_eq!(foreign_get.status, StatusCode::FORBIDDEN);
    assert_eq!(foreign_get.body["error"], "FORBIDDEN");
}

//! Integration tests for the admin back-office: inventory, alerts,
//! order administration and the dashboard.

use http::StatusCode;

use urpearl_entity::Role;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn admin_surface_requires_a_token() {
    let app = TestApp::without_database();

    let response = app.request("GET", "/api/admin/inventory", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn buyers_are_locked_out_of_the_back_office() {
    let app = TestApp::without_database();
    let buyer = helpers::make_user("curious-buyer", Role::Buyer);
    let token = app.token_for(&buyer);

    for path in [
        "/api/admin/inventory",
        "/api/admin/stats",
        "/api/admin/notifications",
    ] {
        let response = app.request("GET", path, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "path {path}");
        assert_eq!(response.body["error"], "FORBIDDEN");
    }
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn stock_drop_raises_a_single_alert() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("stock-admin", Role::Admin).await;
    let product_id = app
        .seed_product_with_threshold("Pearl Powder Jar", "pearl-powder-jar", "25.00", 10, 5)
        .await;

    let dropped = app
        .request(
            "PUT",
            &format!("/api/admin/inventory/{product_id}"),
            Some(serde_json::json!({ "quantity": 3 })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(dropped.status, StatusCode::OK, "{:?}", dropped.body);
    assert_eq!(dropped.body["data"]["quantity"], 3);

    let first = app
        .request("GET", "/api/admin/notifications", None, Some(&admin_token))
        .await;
    assert_eq!(first.body["data"]["unread_count"], 1);
    assert_eq!(
        first.body["data"]["notifications"]["items"][0]["kind"],
        "low_stock"
    );

    // A further drop while the alert is still unread must not stack a
    // second one.
    let again = app
        .request(
            "PUT",
            &format!("/api/admin/inventory/{product_id}"),
            Some(serde_json::json!({ "quantity": 2 })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(again.status, StatusCode::OK);

    let second = app
        .request("GET", "/api/admin/notifications", None, Some(&admin_token))
        .await;
    assert_eq!(second.body["data"]["unread_count"], 1);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn restock_clears_the_unread_alert() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("restock-admin", Role::Admin).await;
    let product_id = app
        .seed_product_with_threshold("Nacre Polish", "nacre-polish", "18.00", 10, 5)
        .await;

    let dropped = app
        .request(
            "PUT",
            &format!("/api/admin/inventory/{product_id}"),
            Some(serde_json::json!({ "quantity": 4 })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(dropped.status, StatusCode::OK);

    let alerted = app
        .request("GET", "/api/admin/notifications", None, Some(&admin_token))
        .await;
    assert_eq!(alerted.body["data"]["unread_count"], 1);

    let restocked = app
        .request(
            "PUT",
            &format!("/api/admin/inventory/{product_id}"),
            Some(serde_json::json!({ "quantity": 40 })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(restocked.status, StatusCode::OK);

    let cleared = app
        .request("GET", "/api/admin/notifications", None, Some(&admin_token))
        .await;
    assert_eq!(cleared.body["data"]["unread_count"], 0);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn adjust_moves_stock_by_a_delta() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("adjust-admin", Role::Admin).await;
    let product_id = app
        .seed_product("Clasp Multi-Pack", "clasp-multi-pack", "12.00", 10)
        .await;

    let down = app
        .request(
            "POST",
            &format!("/api/admin/inventory/{product_id}/adjust"),
            Some(serde_json::json!({ "delta": -4 })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(down.status, StatusCode::OK, "{:?}", down.body);
    assert_eq!(down.body["data"]["quantity"], 6);

    let up = app
        .request(
            "POST",
            &format!("/api/admin/inventory/{product_id}/adjust"),
            Some(serde_json::json!({ "delta": 5 })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(up.body["data"]["quantity"], 11);

    let zero = app
        .request(
            "POST",
            &format!("/api/admin/inventory/{product_id}/adjust"),
            Some(serde_json::json!({ "delta": 0 })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(zero.status, StatusCode::UNPROCESSABLE_ENTITY);

    let too_far = app
        .request(
            "POST",
            &format!("/api/admin/inventory/{product_id}/adjust"),
            Some(serde_json::json!({ "delta": -100 })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(too_far.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(too_far.body["error"], "INSUFFICIENT_STOCK");
    assert_eq!(app.inventory_quantity(product_id).await, 11);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn tightening_the_threshold_can_raise_an_alert() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("threshold-admin", Role::Admin).await;
    let product_id = app
        .seed_product_with_threshold("Velvet Pouch", "velvet-pouch", "8.00", 6, 5)
        .await;

    let quiet = app
        .request("GET", "/api/admin/notifications", None, Some(&admin_token))
        .await;
    assert_eq!(quiet.body["data"]["unread_count"], 0);

    let tightened = app
        .request(
            "PUT",
            &format!("/api/admin/inventory/{product_id}/threshold"),
            Some(serde_json::json!({ "low_stock_threshold": 6 })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(tightened.status, StatusCode::OK, "{:?}", tightened.body);
    assert_eq!(tightened.body["data"]["low_stock_threshold"], 6);

    let alerted = app
        .request("GET", "/api/admin/notifications", None, Some(&admin_token))
        .await;
    assert_eq!(alerted.body["data"]["unread_count"], 1);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn bulk_update_reports_per_row_outcomes() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("bulk-admin", Role::Admin).await;
    let known = app
        .seed_product("Ring Sizer", "ring-sizer", "5.00", 1)
        .await;
    let missing = uuid::Uuid::new_v4();

    let response = app
        .request(
            "POST",
            "/api/admin/inventory/bulk",
            Some(serde_json::json!({
                "updates": [
                    { "product_id": known, "quantity": 30 },
                    { "product_id": missing, "quantity": 7 },
                ],
            })),
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let outcomes = response.body["data"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0]["success"], true);
    assert_eq!(outcomes[1]["success"], false);
    assert_eq!(app.inventory_quantity(known).await, 30);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn low_stock_listing_names_only_depleted_products() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("low-stock-admin", Role::Admin).await;
    app.seed_product_with_threshold("Nearly Gone", "nearly-gone", "99.00", 2, 5)
        .await;
    app.seed_product_with_threshold("Fully Stocked", "fully-stocked", "99.00", 50, 5)
        .await;

    let response = app
        .request("GET", "/api/admin/inventory/low-stock", None, Some(&admin_token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let rows = response.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["product_name"], "Nearly Gone");
    assert_eq!(rows[0]["quantity"], 2);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn admin_sees_all_orders_and_can_filter_by_status() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("orders-admin", Role::Admin).await;
    let (_, buyer_token) = app.create_test_user("orders-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Display Stand", "display-stand", "40.00", 10)
        .await;
    app.place_order(&buyer_token, product_id, 1).await;

    let all = app
        .request("GET", "/api/admin/orders", None, Some(&admin_token))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["data"]["total_items"], 1);

    let paid = app
        .request("GET", "/api/admin/orders?status=paid", None, Some(&admin_token))
        .await;
    assert_eq!(paid.body["data"]["total_items"], 1);

    let shipped = app
        .request(
            "GET",
            "/api/admin/orders?status=shipped",
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(shipped.body["data"]["total_items"], 0);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn back_office_order_lands_on_the_chosen_buyer() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("phone-admin", Role::Admin).await;
    let (buyer, buyer_token) = app.create_test_user("phone-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Baroque Pendant", "baroque-pendant", "150.00", 10)
        .await;

    let response = app
        .request(
            "POST",
            "/api/admin/orders",
            Some(serde_json::json!({
                "user_id": buyer.id,
                "items": [{ "product_id": product_id, "quantity": 2 }],
                "shipping_address": helpers::shipping_address(),
            })),
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "pending");
    assert_eq!(response.body["data"]["total_amount"], "300.00");
    assert_eq!(app.inventory_quantity(product_id).await, 8);

    // The order belongs to the buyer it was placed for, not the admin.
    let own = app
        .request("GET", "/api/orders", None, Some(&buyer_token))
        .await;
    assert_eq!(own.body["data"]["total_items"], 1);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn status_change_is_written_and_announced() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("shipping-admin", Role::Admin).await;
    let (_, buyer_token) = app.create_test_user("shipping-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Courier Box", "courier-box", "15.00", 10)
        .await;
    let order_id = app.place_order(&buyer_token, product_id, 1).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/orders/{order_id}/status"),
            Some(serde_json::json!({ "status": "shipped" })),
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "shipped");

    let feed = app
        .request("GET", "/api/admin/notifications", None, Some(&admin_token))
        .await;
    let items = feed.body["data"]["notifications"]["items"].as_array().unwrap();
    assert!(
        items.iter().any(|n| n["kind"] == "order_status_changed"),
        "Expected an order_status_changed notification, got {items:?}"
    );
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn notifications_can_be_marked_read() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("inbox-admin", Role::Admin).await;
    let first = app
        .seed_product_with_threshold("Alert One", "alert-one", "10.00", 1, 5)
        .await;
    let second = app
        .seed_product_with_threshold("Alert Two", "alert-two", "10.00", 1, 5)
        .await;

    // Touching stock below the threshold files an alert per product.
    for product_id in [first, second] {
        let response = app
            .request(
                "PUT",
                &format!("/api/admin/inventory/{product_id}"),
                Some(serde_json::json!({ "quantity": 1 })),
                Some(&admin_token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let inbox = app
        .request("GET", "/api/admin/notifications", None, Some(&admin_token))
        .await;
    assert_eq!(inbox.body["data"]["unread_count"], 2);
    let notification_id = inbox.body["data"]["notifications"]["items"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let read_one = app
        .request(
            "POST",
            &format!("/api/admin/notifications/{notification_id}/read"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(read_one.status, StatusCode::OK);
    assert!(read_one.body["data"]["read_at"].is_string());

    let read_rest = app
        .request(
            "POST",
            "/api/admin/notifications/read-all",
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(read_rest.status, StatusCode::OK);
    assert_eq!(read_rest.body["data"]["count"], 1);

    let after = app
        .request("GET", "/api/admin/notifications", None, Some(&admin_token))
        .await;
    assert_eq!(after.body["data"]["unread_count"], 0);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn dashboard_aggregates_orders_and_inventory() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("dashboard-admin", Role::Admin).await;
    let (_, buyer_token) = app.create_test_user("dashboard-buyer", Role::Buyer).await;
    let product_id = app
        .seed_product("Statement Necklace", "statement-necklace", "100.00", 10)
        .await;
    app.place_order(&buyer_token, product_id, 2).await;

    let response = app
        .request("GET", "/api/admin/stats", None, Some(&admin_token))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["orders"]["total_orders"], 1);
    assert_eq!(response.body["data"]["orders"]["paid"], 1);
    assert_eq!(response.body["data"]["orders"]["total_revenue"], "200.00");
    assert_eq!(response.body["data"]["inventory"]["total_products"], 1);
    assert_eq!(response.body["data"]["inventory"]["in_stock"], 1);
    assert_eq!(response.body["data"]["inventory"]["out_of_stock"], 0);
}

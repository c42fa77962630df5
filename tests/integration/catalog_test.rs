//! Integration tests for the public catalog and admin product management.

use http::StatusCode;

use urpearl_entity::Role;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn created_product_appears_in_the_catalog() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("catalog-admin", Role::Admin).await;

    let created = app
        .request(
            "POST",
            "/api/admin/products",
            Some(serde_json::json!({
                "name": "South Sea Necklace",
                "description": "18-inch strand of golden South Sea pearls",
                "price": "2500.00",
                "is_best_seller": true,
                "initial_quantity": 12,
            })),
            Some(&admin_token),
        )
        .await;

    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    assert_eq!(created.body["data"]["slug"], "south-sea-necklace");

    let list = app.request("GET", "/api/products", None, None).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body["data"]["total_items"], 1);
    assert_eq!(list.body["data"]["items"][0]["name"], "South Sea Necklace");
    assert_eq!(list.body["data"]["items"][0]["quantity"], 12);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn product_detail_is_served_by_slug() {
    let app = TestApp::new().await;
    app.seed_product("Freshwater Choker", "freshwater-choker", "420.00", 7)
        .await;

    let response = app
        .request("GET", "/api/products/freshwater-choker", None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["slug"], "freshwater-choker");
    assert_eq!(response.body["data"]["quantity"], 7);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn unknown_slug_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/products/no-such-product", None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn duplicate_slug_is_a_conflict() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("dup-admin", Role::Admin).await;

    for _ in 0..2 {
        let response = app
            .request(
                "POST",
                "/api/admin/products",
                Some(serde_json::json!({
                    "name": "Mabe Pearl Ring",
                    "price": "610.00",
                })),
                Some(&admin_token),
            )
            .await;

        if response.status == StatusCode::OK {
            continue;
        }
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.body["error"], "CONFLICT");
        return;
    }
    panic!("Second create with the same slug should conflict");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn products_filter_by_category_slug() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("filter-admin", Role::Admin).await;

    let category = app
        .request(
            "POST",
            "/api/admin/categories",
            Some(serde_json::json!({ "name": "Necklaces" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(category.status, StatusCode::OK, "{:?}", category.body);
    assert_eq!(category.body["data"]["slug"], "necklaces");
    let category_id = category.body["data"]["id"].as_str().unwrap().to_string();

    let in_category = app
        .request(
            "POST",
            "/api/admin/products",
            Some(serde_json::json!({
                "name": "Opera Length Strand",
                "price": "3200.00",
                "category_id": category_id,
                "initial_quantity": 3,
            })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(in_category.status, StatusCode::OK);

    let elsewhere = app
        .request(
            "POST",
            "/api/admin/products",
            Some(serde_json::json!({
                "name": "Plain Shell Clip",
                "price": "45.00",
            })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(elsewhere.status, StatusCode::OK);

    let filtered = app
        .request("GET", "/api/products?category=necklaces", None, None)
        .await;

    assert_eq!(filtered.status, StatusCode::OK);
    assert_eq!(filtered.body["data"]["total_items"], 1);
    assert_eq!(
        filtered.body["data"]["items"][0]["name"],
        "Opera Length Strand"
    );

    let categories = app.request("GET", "/api/categories", None, None).await;
    assert_eq!(categories.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn search_matches_product_names() {
    let app = TestApp::new().await;
    app.seed_product("Golden South Sea Studs", "golden-studs", "980.00", 2)
        .await;
    app.seed_product("Leather Cord", "leather-cord", "30.00", 20)
        .await;

    let response = app
        .request("GET", "/api/products?search=south%20sea", None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 1);
    assert_eq!(
        response.body["data"]["items"][0]["slug"],
        "golden-studs"
    );
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn product_can_be_repriced_and_retired() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("catalog-admin", Role::Admin).await;
    let product_id = app
        .seed_product("Classic Strand", "classic-strand", "500.00", 5)
        .await;

    let updated = app
        .request(
            "PUT",
            &format!("/api/admin/products/{product_id}"),
            Some(serde_json::json!({ "price": "450.00", "is_best_seller": true })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{:?}", updated.body);
    assert_eq!(updated.body["data"]["price"], "450.00");

    let detail = app
        .request("GET", "/api/products/classic-strand", None, None)
        .await;
    assert_eq!(detail.body["data"]["price"], "450.00");

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/admin/products/{product_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = app
        .request("GET", "/api/products/classic-strand", None, None)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn category_can_be_renamed_and_removed() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.create_test_user("category-admin", Role::Admin).await;

    let created = app
        .request(
            "POST",
            "/api/admin/categories",
            Some(serde_json::json!({ "name": "Bracelets" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let category_id = created.body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created.body["data"]["slug"], "bracelets");

    let renamed = app
        .request(
            "PUT",
            &format!("/api/admin/categories/{category_id}"),
            Some(serde_json::json!({ "name": "Bangles" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK, "{:?}", renamed.body);
    assert_eq!(renamed.body["data"]["name"], "Bangles");
    assert_eq!(renamed.body["data"]["slug"], "bangles");

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/admin/categories/{category_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let categories = app.request("GET", "/api/categories", None, None).await;
    assert!(categories.body["data"].as_array().unwrap().is_empty());
}

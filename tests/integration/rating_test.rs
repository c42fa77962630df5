//! Integration tests for product ratings and reviews.

use http::StatusCode;
use uuid::Uuid;

use urpearl_entity::Role;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn rating_rejects_an_out_of_range_score() {
    let app = TestApp::without_database();
    let buyer = helpers::make_user("harsh-critic", Role::Buyer);
    let token = app.token_for(&buyer);

    let response = app
        .request(
            "POST",
            &format!("/api/products/{}/ratings", Uuid::new_v4()),
            Some(serde_json::json!({ "rating": 9 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "VALIDATION");
}

#[tokio::test]
async fn review_text_is_capped_at_a_thousand_chars() {
    let app = TestApp::without_database();
    let buyer = helpers::make_user("novelist", Role::Buyer);
    let token = app.token_for(&buyer);

    let response = app
        .request(
            "POST",
            &format!("/api/products/{}/ratings", Uuid::new_v4()),
            Some(serde_json::json!({
                "rating": 5,
                "review": "a".repeat(1001),
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "VALIDATION");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn verified_purchaser_can_review_once() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("happy-customer", Role::Buyer).await;
    let product_id = app
        .seed_product("Blister Pearl Locket", "blister-pearl-locket", "210.00", 6)
        .await;
    app.place_order(&token, product_id, 1).await;

    let created = app
        .request(
            "POST",
            &format!("/api/products/{product_id}/ratings"),
            Some(serde_json::json!({
                "rating": 5,
                "review": "Exactly as pictured, lovely luster.",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    assert_eq!(created.body["data"]["rating"], 5);
    assert_eq!(created.body["data"]["is_verified_purchase"], true);

    let listed = app
        .request(
            "GET",
            "/api/products/blister-pearl-locket/ratings",
            None,
            None,
        )
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"]["count"], 1);
    assert_eq!(listed.body["data"]["average"], 5.0);
    assert_eq!(
        listed.body["data"]["ratings"]["items"][0]["author_name"],
        "happy-customer"
    );

    let duplicate = app
        .request(
            "POST",
            &format!("/api/products/{product_id}/ratings"),
            Some(serde_json::json!({ "rating": 4 })),
            Some(&token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["error"], "CONFLICT");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn non_purchaser_cannot_review() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("drive-by-critic", Role::Buyer).await;
    let product_id = app
        .seed_product("Seed Pearl Anklet", "seed-pearl-anklet", "95.00", 9)
        .await;

    let response = app
        .request(
            "POST",
            &format!("/api/products/{product_id}/ratings"),
            Some(serde_json::json!({ "rating": 1, "review": "Never bought it" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn author_can_amend_their_review() {
    let app = TestApp::new().await;
    let (_, token) = app.create_test_user("second-thoughts", Role::Buyer).await;
    let product_id = app
        .seed_product("Button Pearl Cuff", "button-pearl-cuff", "340.00", 4)
        .await;
    app.place_order(&token, product_id, 1).await;

    let created = app
        .request(
            "POST",
            &format!("/api/products/{product_id}/ratings"),
            Some(serde_json::json!({ "rating": 5 })),
            Some(&token),
        )
        .await;
    let rating_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let updated = app
        .request(
            "PUT",
            &format!("/api/ratings/{rating_id}"),
            Some(serde_json::json!({
                "rating": 3,
                "review": "Clasp loosened after a week.",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{:?}", updated.body);
    assert_eq!(updated.body["data"]["rating"], 3);

    let listed = app
        .request("GET", "/api/products/button-pearl-cuff/ratings", None, None)
        .await;
    assert_eq!(listed.body["data"]["average"], 3.0);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn admin_can_moderate_any_review() {
    let app = TestApp::new().await;
    let (_, buyer_token) = app.create_test_user("review-author", Role::Buyer).await;
    let (_, admin_token) = app.create_test_user("moderator", Role::Admin).await;
    let product_id = app
        .seed_product("Half Pearl Studs", "half-pearl-studs", "60.00", 8)
        .await;
    app.place_order(&buyer_token, product_id, 1).await;

    let created = app
        .request(
            "POST",
            &format!("/api/products/{product_id}/ratings"),
            Some(serde_json::json!({ "rating": 1, "review": "spam spam spam" })),
            Some(&buyer_token),
        )
        .await;
    let rating_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/ratings/{rating_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let listed = app
        .request("GET", "/api/products/half-pearl-studs/ratings", None, None)
        .await;
    assert_eq!(listed.body["data"]["count"], 0);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn strangers_cannot_edit_someone_elses_review() {
    let app = TestApp::new().await;
    let (_, author_token) = app.create_test_user("original-author", Role::Buyer).await;
    let (_, stranger_token) = app.create_test_user("meddler", Role::Buyer).await;
    let product_id = app
        .seed_product("Rice Pearl Strand", "rice-pearl-strand", "130.00", 5)
        .await;
    app.place_order(&author_token, product_id, 1).await;

    let created = app
        .request(
            "POST",
            &format!("/api/products/{product_id}/ratings"),
            Some(serde_json::json!({ "rating": 4 })),
            Some(&author_token),
        )
        .await;
    let rating_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/ratings/{rating_id}"),
            Some(serde_json::json!({ "rating": 1 })),
            Some(&stranger_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn averages_are_exact_over_all_reviews() {
    let app = TestApp::new().await;
    let product_id = app
        .seed_product("Tahitian Ring", "tahitian-ring", "900.00", 30)
        .await;

    let empty = app
        .request("GET", "/api/products/tahitian-ring/ratings", None, None)
        .await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["data"]["average"], 0.0);
    assert_eq!(empty.body["data"]["count"], 0);

    for (name, score) in [("five-star", 5), ("four-star", 4), ("three-star", 3)] {
        let (_, token) = app.create_test_user(name, Role::Buyer).await;
        app.place_order(&token, product_id, 1).await;
        let posted = app
            .request(
                "POST",
                &format!("/api/products/{product_id}/ratings"),
                Some(serde_json::json!({ "rating": score })),
                Some(&token),
            )
            .await;
        assert_eq!(posted.status, StatusCode::OK, "{:?}", posted.body);
    }

    let listed = app
        .request("GET", "/api/products/tahitian-ring/ratings", None, None)
        .await;
    assert_eq!(listed.body["data"]["average"], 4.0);
    assert_eq!(listed.body["data"]["count"], 3);
}

//! Integration tests for OAuth sign-in and the bearer-token guard.

use http::StatusCode;

use urpearl_auth::JwtEncoder;
use urpearl_core::config::AuthConfig;
use urpearl_entity::Role;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let app = TestApp::without_database();

    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn me_with_garbage_token_is_unauthorized() {
    let app = TestApp::without_database();

    let response = app
        .request("GET", "/api/auth/me", None, Some("not.a.jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn non_bearer_authorization_header_is_rejected() {
    use tower::ServiceExt;

    let app = TestApp::without_database();

    let req = http::Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header("Authorization", "Basic cGVhcmw6c2hlbGw=")
        .body(axum::body::Body::empty())
        .expect("Failed to build request");

    let response = app
        .router
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_wrong_secret_is_rejected() {
    let app = TestApp::without_database();

    let foreign_encoder = JwtEncoder::new(&AuthConfig {
        jwt_secret: "some-other-secret".to_string(),
        token_ttl_hours: 1,
    });
    let user = helpers::make_user("imposter", Role::Admin);
    let token = foreign_encoder
        .issue_token(&user)
        .expect("Failed to issue token")
        .access_token;

    let response = app
        .request("GET", "/api/auth/me", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn oauth_rejects_invalid_payload() {
    let app = TestApp::without_database();

    let response = app
        .request(
            "POST",
            "/api/auth/oauth",
            Some(serde_json::json!({
                "provider": "",
                "provider_id": "",
                "email": "not-an-email",
                "name": "",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "VALIDATION");
    assert!(response.body["details"].is_object());
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn oauth_sign_in_provisions_a_buyer_account() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/oauth",
            Some(serde_json::json!({
                "provider": "google",
                "provider_id": "sub-pearl-1",
                "email": "pearl@urpearl.test",
                "name": "Pearl Santos",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["success"], true);
    assert!(response.body["data"]["access_token"].is_string());
    assert_eq!(response.body["data"]["user"]["role"], "buyer");
    assert_eq!(response.body["data"]["user"]["email"], "pearl@urpearl.test");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn oauth_sign_in_updates_the_existing_account() {
    let app = TestApp::new().await;

    let first = app
        .request(
            "POST",
            "/api/auth/oauth",
            Some(serde_json::json!({
                "provider": "google",
                "provider_id": "sub-pearl-2",
                "email": "repeat@urpearl.test",
                "name": "Old Name",
            })),
            None,
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request(
            "POST",
            "/api/auth/oauth",
            Some(serde_json::json!({
                "provider": "google",
                "provider_id": "sub-pearl-2",
                "email": "repeat@urpearl.test",
                "name": "New Name",
                "avatar_url": "https://cdn.urpearl.test/a.png",
            })),
            None,
        )
        .await;

    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(
        second.body["data"]["user"]["id"],
        first.body["data"]["user"]["id"],
        "Repeat sign-in must not create a second account"
    );
    assert_eq!(second.body["data"]["user"]["name"], "New Name");
}

#[tokio::test]
#[ignore = "requires a live Postgres via URPEARL_TEST_DATABASE_URL"]
async fn me_returns_the_callers_profile() {
    let app = TestApp::new().await;
    let (user, token) = app.create_test_user("profile-user", Role::Buyer).await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["email"], user.email.as_str());
    assert_eq!(response.body["data"]["role"], "buyer");
}

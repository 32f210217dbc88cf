//! Integration tests for registration, login and bearer protection.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`store-cli migrate`)
//! - The API running (`cargo run -p store-manager-api`)

use reqwest::StatusCode;
use serde_json::{Value, json};
use store_manager_integration_tests::TestContext;

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_returns_token_for_registered_user() {
    let ctx = TestContext::new().await;
    let (email, secret) = ctx.register_user().await;

    let resp = ctx
        .client
        .post(ctx.url("/auth/login"))
        .json(&json!({ "email": email, "secret": secret }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid login response");
    assert_eq!(body["email"], json!(email));
    assert_eq!(body["token"].as_str().map(|t| t.split('.').count()), Some(3));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_fails_on_any_mismatch() {
    let ctx = TestContext::new().await;
    let (email, secret) = ctx.register_user().await;

    let attempts = [
        json!({ "email": email, "secret": format!("{secret}x") }),
        json!({ "email": format!("x{email}"), "secret": secret }),
        json!({ "email": "not-an-email", "secret": secret }),
    ];

    for attempt in attempts {
        let resp = ctx
            .client
            .post(ctx.url("/auth/login"))
            .json(&attempt)
            .send()
            .await
            .expect("Failed to log in");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{attempt}");
    }
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_secrets_are_stored_hashed() {
    let ctx = TestContext::new().await;
    let (email, secret) = ctx.register_user().await;

    let stored: String =
        sqlx::query_scalar("SELECT secret_hash FROM store.app_user WHERE email = $1")
            .bind(&email)
            .fetch_one(&ctx.pool)
            .await
            .expect("Failed to read credential");

    assert_ne!(stored, secret);
    assert!(stored.starts_with("$argon2id$"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_protected_routes_need_valid_token() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(ctx.url("/products/dashboard"))
        .send()
        .await
        .expect("Failed to call dashboard");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let token = ctx.token().await;
    let resp = ctx
        .authed(ctx.client.get(ctx.url("/products/dashboard")), &token)
        .send()
        .await
        .expect("Failed to call dashboard");
    assert_eq!(resp.status(), StatusCode::OK);
}

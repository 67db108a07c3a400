mod helpers;

use helpers::auth::{register_and_login, TEST_PASSWORD};
use helpers::setup_test_app;
use serde_json::json;

#[tokio::test]
async fn register_then_login_and_use_token() {
    let app = setup_test_app().await;
    let user = register_and_login(app.client(), "viewer").await;

    let response = app
        .client()
        .get("/api/v0/media/mine")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn register_never_returns_password_hash() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v0/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": TEST_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 201);

    let body: serde_json::Value = response.json();
    assert!(body.get("password_hash").is_none());
    // Role defaults to viewer when omitted.
    assert_eq!(body["role"], "viewer");
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = setup_test_app().await;

    let payload = json!({
        "username": "bob",
        "email": "bob@example.com",
        "password": TEST_PASSWORD,
    });

    let first = app.client().post("/api/v0/auth/register").json(&payload).await;
    assert_eq!(first.status_code(), 201);

    let second = app.client().post("/api/v0/auth/register").json(&payload).await;
    assert_eq!(second.status_code(), 409);
}

#[tokio::test]
async fn short_password_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v0/auth/register")
        .json(&json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "short",
        }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_identical() {
    let app = setup_test_app().await;
    let user = register_and_login(app.client(), "viewer").await;

    let wrong_password = app
        .client()
        .post("/api/v0/auth/login")
        .json(&json!({ "email": user.email, "password": "not-the-password" }))
        .await;
    assert_eq!(wrong_password.status_code(), 401);

    let unknown_email = app
        .client()
        .post("/api/v0/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }))
        .await;
    assert_eq!(unknown_email.status_code(), 401);

    let a: serde_json::Value = wrong_password.json();
    let b: serde_json::Value = unknown_email.json();
    assert_eq!(a["error"], b["error"]);
}

#[tokio::test]
async fn missing_or_garbage_token_unauthorized() {
    let app = setup_test_app().await;

    let missing = app.client().get("/api/v0/media/mine").await;
    assert_eq!(missing.status_code(), 401);

    let garbage = app
        .client()
        .get("/api/v0/media/mine")
        .add_header("Authorization", "Bearer not.a.token")
        .await;
    assert_eq!(garbage.status_code(), 401);
}

#[tokio::test]
async fn user_listing_is_admin_only() {
    let app = setup_test_app().await;
    let viewer = register_and_login(app.client(), "viewer").await;
    let admin = register_and_login(app.client(), "admin").await;

    let forbidden = app
        .client()
        .get("/api/v0/auth/users")
        .add_header("Authorization", format!("Bearer {}", viewer.token))
        .await;
    assert_eq!(forbidden.status_code(), 403);

    let allowed = app
        .client()
        .get("/api/v0/auth/users")
        .add_header("Authorization", format!("Bearer {}", admin.token))
        .await;
    assert_eq!(allowed.status_code(), 200);

    let accounts: Vec<serde_json::Value> = allowed.json();
    assert!(accounts.len() >= 2);
}

#[tokio::test]
async fn admin_deletes_account() {
    let app = setup_test_app().await;
    let admin = register_and_login(app.client(), "admin").await;
    let victim = register_and_login(app.client(), "viewer").await;

    let response = app
        .client()
        .delete(&format!("/api/v0/auth/users/{}", victim.account_id))
        .add_header("Authorization", format!("Bearer {}", admin.token))
        .await;
    assert_eq!(response.status_code(), 200);

    let again = app
        .client()
        .delete(&format!("/api/v0/auth/users/{}", victim.account_id))
        .add_header("Authorization", format!("Bearer {}", admin.token))
        .await;
    assert_eq!(again.status_code(), 404);
}

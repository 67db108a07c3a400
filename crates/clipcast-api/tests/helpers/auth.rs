use axum_test::TestServer;
use serde_json::json;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// A registered, logged-in test user.
pub struct TestUser {
    pub account_id: Uuid,
    pub email: String,
    pub token: String,
}

/// Register a fresh account with the given role and log it in.
pub async fn register_and_login(client: &TestServer, role: &str) -> TestUser {
    let email = format!("{}-{}@example.com", role, Uuid::new_v4());

    let response = client
        .post("/api/v0/auth/register")
        .json(&json!({
            "username": format!("{}-user", role),
            "email": email,
            "password": TEST_PASSWORD,
            "role": role,
        }))
        .await;
    assert_eq!(response.status_code(), 201, "register failed: {}", response.text());

    let account: serde_json::Value = response.json();
    let account_id = account["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("account id in register response");

    let response = client
        .post("/api/v0/auth/login")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 200, "login failed: {}", response.text());

    let body: serde_json::Value = response.json();
    let token = body["token"].as_str().expect("token in login response").to_string();

    TestUser {
        account_id,
        email,
        token,
    }
}

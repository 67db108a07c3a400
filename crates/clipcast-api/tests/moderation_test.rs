mod helpers;

use helpers::auth::register_and_login;
use helpers::{setup_test_app, setup_test_app_with, upload_video, wait_for_completion};

#[tokio::test]
async fn block_flags_video_and_hides_it_from_feed() {
    let app = setup_test_app().await;
    let editor = register_and_login(app.client(), "editor").await;
    let admin = register_and_login(app.client(), "admin").await;

    let record = upload_video(&app, &editor.token, "Feed clip", vec![5u8; 512]).await;
    let id = record["id"].as_str().unwrap().to_string();
    wait_for_completion(&app, &editor.token, &id).await;

    // Safe and completed, so it is on the feed.
    let feed = app.client().get("/api/v0/media/feed").await;
    let records: Vec<serde_json::Value> = feed.json();
    assert!(records.iter().any(|r| r["id"] == id.as_str()));

    let blocked = app
        .client()
        .put(&format!("/api/v0/media/{}/block", id))
        .add_header("Authorization", format!("Bearer {}", admin.token))
        .await;
    assert_eq!(blocked.status_code(), 200);
    let body: serde_json::Value = blocked.json();
    assert_eq!(body["classification"], "flagged");
    assert_eq!(body["status"], "completed");

    // Off the feed, still visible to its owner.
    let feed = app.client().get("/api/v0/media/feed").await;
    let records: Vec<serde_json::Value> = feed.json();
    assert!(records.iter().all(|r| r["id"] != id.as_str()));

    let mine = app
        .client()
        .get("/api/v0/media/mine")
        .add_header("Authorization", format!("Bearer {}", editor.token))
        .await;
    let records: Vec<serde_json::Value> = mine.json();
    assert!(records.iter().any(|r| r["id"] == id.as_str()));
}

#[tokio::test]
async fn unblock_restores_video_to_feed() {
    let app = setup_test_app().await;
    let editor = register_and_login(app.client(), "editor").await;
    let admin = register_and_login(app.client(), "admin").await;

    let record = upload_video(&app, &editor.token, "Restored clip", vec![5u8; 512]).await;
    let id = record["id"].as_str().unwrap().to_string();
    wait_for_completion(&app, &editor.token, &id).await;

    let auth = format!("Bearer {}", admin.token);
    app.client()
        .put(&format!("/api/v0/media/{}/block", id))
        .add_header("Authorization", &auth)
        .await;

    let unblocked = app
        .client()
        .put(&format!("/api/v0/media/{}/unblock", id))
        .add_header("Authorization", &auth)
        .await;
    assert_eq!(unblocked.status_code(), 200);
    let body: serde_json::Value = unblocked.json();
    assert_eq!(body["classification"], "safe");

    let feed = app.client().get("/api/v0/media/feed").await;
    let records: Vec<serde_json::Value> = feed.json();
    assert!(records.iter().any(|r| r["id"] == id.as_str()));
}

#[tokio::test]
async fn repeated_block_is_idempotent() {
    let app = setup_test_app().await;
    let editor = register_and_login(app.client(), "editor").await;
    let admin = register_and_login(app.client(), "admin").await;

    let record = upload_video(&app, &editor.token, "Twice blocked", vec![5u8; 512]).await;
    let id = record["id"].as_str().unwrap().to_string();
    wait_for_completion(&app, &editor.token, &id).await;

    let auth = format!("Bearer {}", admin.token);
    let first = app
        .client()
        .put(&format!("/api/v0/media/{}/block", id))
        .add_header("Authorization", &auth)
        .await;
    assert_eq!(first.status_code(), 200);

    let second = app
        .client()
        .put(&format!("/api/v0/media/{}/block", id))
        .add_header("Authorization", &auth)
        .await;
    assert_eq!(second.status_code(), 200);
    let body: serde_json::Value = second.json();
    assert_eq!(body["classification"], "flagged");
}

#[tokio::test]
async fn blocking_unfinished_video_conflicts() {
    // Slow ticks keep the record in processing while the override lands.
    let app = setup_test_app_with(|config| {
        config.processing_tick_ms = 2000;
    })
    .await;
    let editor = register_and_login(app.client(), "editor").await;
    let admin = register_and_login(app.client(), "admin").await;

    let record = upload_video(&app, &editor.token, "Still cooking", vec![5u8; 512]).await;
    let id = record["id"].as_str().unwrap();

    let response = app
        .client()
        .put(&format!("/api/v0/media/{}/block", id))
        .add_header("Authorization", format!("Bearer {}", admin.token))
        .await;
    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn moderation_is_admin_only() {
    let app = setup_test_app().await;
    let editor = register_and_login(app.client(), "editor").await;

    let record = upload_video(&app, &editor.token, "Not yours to block", vec![5u8; 512]).await;
    let id = record["id"].as_str().unwrap().to_string();
    wait_for_completion(&app, &editor.token, &id).await;

    // Even the owner cannot moderate without the admin role.
    let response = app
        .client()
        .put(&format!("/api/v0/media/{}/block", id))
        .add_header("Authorization", format!("Bearer {}", editor.token))
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn moderating_missing_video_not_found() {
    let app = setup_test_app().await;
    let admin = register_and_login(app.client(), "admin").await;

    let response = app
        .client()
        .put(&format!("/api/v0/media/{}/block", uuid::Uuid::new_v4()))
        .add_header("Authorization", format!("Bearer {}", admin.token))
        .await;
    assert_eq!(response.status_code(), 404);
}

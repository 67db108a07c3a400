//! Test helpers: build AppState and router for integration tests.
//!
//! Each test gets its own sqlite file and blob directory under a tempdir, so
//! tests are hermetic and run in parallel.

pub mod auth;

use axum_test::TestServer;
use clipcast_api::events::EventHub;
use clipcast_api::pipeline::SimulatedDriver;
use clipcast_api::setup::routes;
use clipcast_api::state::AppState;
use clipcast_core::Config;
use clipcast_db::{AccountRepository, MediaRepository};
use clipcast_storage::LocalStorage;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const TEST_JWT_SECRET: &str = "test-secret-0123456789";

/// Test application: server, shared state, and owned tempdirs.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        server_port: 0,
        database_url: format!(
            "sqlite://{}/test.db?mode=rwc",
            temp_dir.path().display()
        ),
        storage_path: temp_dir.path().join("blobs").display().to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_hours: 1,
        max_video_size_bytes: 10 * 1024 * 1024,
        cors_origins: Vec::new(),
        // Fast ticks so lifecycle tests complete in milliseconds.
        processing_tick_ms: 10,
        processing_step_percent: 25,
        processing_safe_probability: 1.0,
    }
}

/// Setup a test app with fast processing that always classifies safe.
pub async fn setup_test_app() -> TestApp {
    setup_app(|_| {}, false).await
}

/// Setup a test app with a tweaked configuration.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    setup_app(configure, false).await
}

/// Setup a test app served over a real HTTP transport, for websocket tests.
pub async fn setup_http_test_app() -> TestApp {
    setup_app(|_| {}, true).await
}

async fn setup_app(configure: impl FnOnce(&mut Config), http_transport: bool) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let mut config = test_config(&temp_dir);
    configure(&mut config);

    let pool = clipcast_db::setup_database(&config.database_url)
        .await
        .expect("Failed to set up test database");

    let storage = LocalStorage::new(&config.storage_path)
        .await
        .expect("Failed to create local storage");

    let driver = SimulatedDriver::from_config(&config);

    let state = Arc::new(AppState {
        media: MediaRepository::new(pool.clone()),
        accounts: AccountRepository::new(pool),
        storage: Arc::new(storage),
        events: EventHub::new(),
        driver: Arc::new(driver),
        config,
    });

    let router = routes::setup_routes(state.clone()).expect("Failed to build router");
    let server = if http_transport {
        TestServer::builder()
            .http_transport()
            .build(router)
            .expect("Failed to start test server")
    } else {
        TestServer::new(router).expect("Failed to start test server")
    };

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// Upload a video as the given user and return the created record as JSON.
pub async fn upload_video(
    app: &TestApp,
    token: &str,
    title: &str,
    bytes: Vec<u8>,
) -> serde_json::Value {
    let part = axum_test::multipart::Part::bytes(bytes)
        .file_name("clip.mp4")
        .mime_type("video/mp4");
    let form = axum_test::multipart::MultipartForm::new()
        .add_text("title", title)
        .add_part("file", part);

    let response = app
        .client()
        .post("/api/v0/media")
        .add_header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 201, "upload failed: {}", response.text());
    response.json()
}

/// Poll `/media/mine` until the record reaches `completed`.
pub async fn wait_for_completion(app: &TestApp, token: &str, id: &str) -> serde_json::Value {
    for _ in 0..500 {
        let response = app
            .client()
            .get("/api/v0/media/mine")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;
        assert_eq!(response.status_code(), 200);

        let records: Vec<serde_json::Value> = response.json();
        if let Some(record) = records.iter().find(|r| r["id"] == id) {
            if record["status"] == "completed" {
                return record.clone();
            }
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("media {} never reached completed", id);
}

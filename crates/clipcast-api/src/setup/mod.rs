//! Application setup and initialization
//!
//! All startup wiring lives here, extracted from main.rs so integration
//! tests can build the same application against their own configuration.

pub mod routes;
pub mod server;

use crate::events::EventHub;
use crate::pipeline::SimulatedDriver;
use crate::state::AppState;
use anyhow::{Context, Result};
use clipcast_core::Config;
use clipcast_db::{AccountRepository, MediaRepository};
use clipcast_storage::LocalStorage;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initialize structured logging from `RUST_LOG`, with a sane default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clipcast=debug,tower_http=debug,info")),
        )
        .init();
}

/// Initialize the entire application: database, storage, shared state,
/// and the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let pool = clipcast_db::setup_database(&config.database_url).await?;

    let storage = LocalStorage::new(&config.storage_path)
        .await
        .context("Failed to initialize blob storage")?;

    let driver = SimulatedDriver::from_config(&config);

    let state = Arc::new(AppState {
        media: MediaRepository::new(pool.clone()),
        accounts: AccountRepository::new(pool),
        storage: Arc::new(storage),
        events: EventHub::new(),
        driver: Arc::new(driver),
        config,
    });

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}

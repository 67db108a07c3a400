//! Application state.
//!
//! Shared services are built once at startup and injected everywhere through
//! `Arc<AppState>`. The event hub is an explicit service object here rather
//! than ambient global state.

use crate::events::EventHub;
use crate::pipeline::ProcessingDriver;
use clipcast_core::Config;
use clipcast_db::{AccountRepository, MediaRepository};
use clipcast_storage::Storage;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub media: MediaRepository,
    pub accounts: AccountRepository,
    pub storage: Arc<dyn Storage>,
    pub events: EventHub,
    pub driver: Arc<dyn ProcessingDriver>,
}

//! Live lifecycle event fanout.
//!
//! The hub wraps a broadcast channel: the pipeline publishes every transition
//! and each connected websocket client holds a receiver. Delivery is
//! at-most-once and best-effort; a client that connects late or lags behind
//! reconciles through the pull listings, which remain the source of truth.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use clipcast_core::models::MediaEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::state::AppState;

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for media lifecycle events.
///
/// Created once at startup and injected through `AppState`.
#[derive(Clone)]
pub struct EventHub {
    tx: broadcast::Sender<MediaEvent>,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish an event to all current subscribers. Having no subscribers is
    /// not an error.
    pub fn publish(&self, event: MediaEvent) {
        let receivers = self.tx.receiver_count();
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!(media_id = %event.id, "No subscribers for lifecycle event");
        } else {
            tracing::debug!(
                media_id = %event.id,
                status = %event.status,
                progress = event.progress,
                receivers,
                "Published lifecycle event"
            );
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MediaEvent> {
        self.tx.subscribe()
    }
}

/// `GET /api/v0/media/events`: upgrade to a websocket and forward lifecycle
/// events as JSON text frames. Server-initiated only; client frames are
/// ignored apart from close.
pub async fn media_events(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> Response {
    let hub = state.events.clone();
    ws.on_upgrade(move |socket| forward_events(socket, hub))
}

async fn forward_events(mut socket: WebSocket, hub: EventHub) {
    let mut rx = hub.subscribe();
    tracing::debug!("Event subscriber connected");

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to serialize lifecycle event");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Dropped messages are reconciled via the pull listings.
                    tracing::warn!(missed, "Event subscriber lagged, dropping messages");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Event subscriber disconnected");
}

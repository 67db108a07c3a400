//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::events::media_events;
use crate::handlers;
use crate::handlers::media_upload::MULTIPART_OVERHEAD_BYTES;
use crate::state::AppState;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state.config.cors_origins)?;
    let body_ceiling = (state.config.max_video_size_bytes + MULTIPART_OVERHEAD_BYTES) as usize;

    let media_routes = Router::new()
        .route("/media", post(handlers::media_upload::upload_media))
        .route("/media/feed", get(handlers::media_list::list_feed))
        .route("/media/mine", get(handlers::media_list::list_mine))
        .route("/media/all", get(handlers::media_list::list_all))
        .route(
            "/media/stream/{key}",
            get(handlers::media_stream::stream_media),
        )
        .route("/media/events", get(media_events))
        .route(
            "/media/{id}",
            delete(handlers::media_delete::delete_media),
        )
        .route(
            "/media/{id}/block",
            put(handlers::media_moderation::block_media),
        )
        .route(
            "/media/{id}/unblock",
            put(handlers::media_moderation::unblock_media),
        );

    let auth_routes = Router::new()
        .route("/auth/register", post(handlers::accounts::register))
        .route("/auth/login", post(handlers::accounts::login))
        .route("/auth/users", get(handlers::accounts::list_accounts))
        .route(
            "/auth/users/{id}",
            delete(handlers::accounts::delete_account),
        );

    let app = Router::new()
        .nest("/api/v0", media_routes.merge(auth_routes))
        .route("/api/openapi.json", get(openapi_spec))
        .route("/health", get(health))
        // The axum default (2 MiB) is far below a video upload; the real
        // per-file ceiling is enforced while the stream is consumed.
        .layer(DefaultBodyLimit::max(body_ceiling))
        .layer(RequestBodyLimitLayer::new(body_ceiling))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(origins: &[String]) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

    if origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<_, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(methods)
        .allow_headers(Any))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

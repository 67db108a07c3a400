//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use clipcast_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clipcast API",
        version = "0.1.0",
        description = "Video platform API: authenticated uploads, asynchronous \
                       classification with live progress over websocket, \
                       range-addressable streaming, and moderation overrides. \
                       All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Media
        handlers::media_upload::upload_media,
        handlers::media_list::list_feed,
        handlers::media_list::list_mine,
        handlers::media_list::list_all,
        handlers::media_stream::stream_media,
        handlers::media_delete::delete_media,
        // Moderation
        handlers::media_moderation::block_media,
        handlers::media_moderation::unblock_media,
        // Auth
        handlers::accounts::register,
        handlers::accounts::login,
        handlers::accounts::list_accounts,
        handlers::accounts::delete_account,
    ),
    components(schemas(
        models::MediaResponse,
        models::MediaStatus,
        models::Classification,
        models::MediaEvent,
        models::AccountResponse,
        models::Role,
        handlers::accounts::RegisterRequest,
        handlers::accounts::LoginRequest,
        handlers::accounts::LoginResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "media", description = "Upload, listing, streaming, and deletion"),
        (name = "moderation", description = "Administrative classification overrides"),
        (name = "auth", description = "Accounts and bearer tokens")
    )
)]
pub struct ApiDoc;

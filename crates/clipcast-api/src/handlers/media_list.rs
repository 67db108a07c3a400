//! Listing endpoints: the public feed and the authenticated views.

use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use clipcast_core::models::{MediaResponse, Role};
use std::sync::Arc;

/// The public feed: completed, safe videos only, newest first.
#[utoipa::path(
    get,
    path = "/api/v0/media/feed",
    tag = "media",
    responses(
        (status = 200, description = "Publishable videos, newest first", body = Vec<MediaResponse>)
    )
)]
pub async fn list_feed(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MediaResponse>>, HttpAppError> {
    let records = state.media.list_feed().await?;
    Ok(Json(records.into_iter().map(MediaResponse::from).collect()))
}

/// Everything the caller owns, regardless of status or classification.
#[utoipa::path(
    get,
    path = "/api/v0/media/mine",
    tag = "media",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's videos, newest first", body = Vec<MediaResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_mine(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<Json<Vec<MediaResponse>>, HttpAppError> {
    let records = state.media.list_owned(ctx.account_id).await?;
    Ok(Json(records.into_iter().map(MediaResponse::from).collect()))
}

/// Moderation view across all accounts.
#[utoipa::path(
    get,
    path = "/api/v0/media/all",
    tag = "media",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every video on the platform, newest first", body = Vec<MediaResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<Json<Vec<MediaResponse>>, HttpAppError> {
    crate::policy::require_role(&ctx, &[Role::Admin])?;
    let records = state.media.list_all().await?;
    Ok(Json(records.into_iter().map(MediaResponse::from).collect()))
}

//! Deletion: blob first, then record, owner or admin only.

use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use clipcast_core::AppError;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/v0/media/{id}",
    tag = "media",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Media id")),
    responses(
        (status = 200, description = "Video deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "No such video", body = ErrorResponse)
    )
)]
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, HttpAppError> {
    let record = state
        .media
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("media {} not found", id)))?;

    crate::policy::require_owner_or_admin(&ctx, record.owner_id)?;

    // Blob first: a record without a blob 404s cleanly on stream, a blob
    // without a record would leak disk forever.
    state.storage.delete(&record.storage_key).await?;
    state.media.delete(id).await?;

    tracing::info!(
        media_id = %id,
        caller_id = %ctx.account_id,
        storage_key = %record.storage_key,
        "Video deleted"
    );

    Ok(Json(json!({ "message": "Video deleted" })))
}

//! Administrative classification overrides.
//!
//! Overrides go through the same compare-and-set writes as the pipeline, so
//! an admin racing the driver task gets a 409 instead of silently clobbering
//! a transition that landed first.

use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use clipcast_core::models::{Classification, MediaEvent, MediaResponse, MediaStatus, Role};
use clipcast_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    put,
    path = "/api/v0/media/{id}/block",
    tag = "moderation",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Media id")),
    responses(
        (status = 200, description = "Video flagged", body = MediaResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "No such video", body = ErrorResponse),
        (status = 409, description = "Video is still processing or was modified concurrently", body = ErrorResponse)
    )
)]
pub async fn block_media(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<MediaResponse>, HttpAppError> {
    override_classification(&state, &ctx, id, Classification::Flagged).await
}

#[utoipa::path(
    put,
    path = "/api/v0/media/{id}/unblock",
    tag = "moderation",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Media id")),
    responses(
        (status = 200, description = "Video restored to safe", body = MediaResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "No such video", body = ErrorResponse),
        (status = 409, description = "Video is still processing or was modified concurrently", body = ErrorResponse)
    )
)]
pub async fn unblock_media(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<MediaResponse>, HttpAppError> {
    override_classification(&state, &ctx, id, Classification::Safe).await
}

async fn override_classification(
    state: &Arc<AppState>,
    ctx: &AuthContext,
    id: Uuid,
    classification: Classification,
) -> Result<Json<MediaResponse>, HttpAppError> {
    crate::policy::require_role(ctx, &[Role::Admin])?;

    let record = state
        .media
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("media {} not found", id)))?;

    // Verdicts only exist once processing has finished.
    if record.status != MediaStatus::Completed {
        return Err(AppError::ConflictingWrite(format!(
            "media {} is still {}, wait for processing to finish",
            id, record.status
        ))
        .into());
    }

    // Idempotent: repeating an override is a no-op, not a version bump.
    if record.classification == classification {
        return Ok(Json(MediaResponse::from(record)));
    }

    let updated = state
        .media
        .set_classification(id, record.version, classification)
        .await?;

    tracing::info!(
        media_id = %id,
        admin_id = %ctx.account_id,
        classification = %classification,
        "Classification overridden"
    );

    state.events.publish(MediaEvent {
        id: updated.id,
        progress: 100,
        status: updated.status,
        classification: Some(updated.classification),
    });

    Ok(Json(MediaResponse::from(updated)))
}

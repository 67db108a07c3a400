//! Upload intake: validation gate, streamed blob write, record creation, and
//! pipeline kickoff.

use crate::error::{ErrorResponse, HttpAppError};
use crate::pipeline::spawn_processing;
use crate::state::AppState;
use axum::{
    extract::{multipart::Field, Multipart, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use clipcast_core::models::{MediaResponse, Role};
use clipcast_core::AppError;
use clipcast_storage::generate_storage_key;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Slack on top of the upload ceiling for multipart framing and form fields.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

#[utoipa::path(
    post,
    path = "/api/v0/media",
    tag = "media",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video accepted, processing started", body = MediaResponse),
        (status = 400, description = "Not a video file", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller may not upload", body = ErrorResponse),
        (status = 413, description = "File exceeds the size ceiling", body = ErrorResponse)
    )
)]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    ctx: crate::auth::AuthContext,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MediaResponse>), HttpAppError> {
    crate::policy::require_role(&ctx, &[Role::Editor, Role::Admin])?;

    let limit = state.config.max_video_size_bytes;

    // Fail fast on the declared size before reading the body.
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if let Some(declared) = declared {
        if declared > limit + MULTIPART_OVERHEAD_BYTES {
            return Err(AppError::PayloadTooLarge {
                size: declared,
                limit,
            }
            .into());
        }
    }

    let mut title: Option<String> = None;
    let mut stored: Option<StoredUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("title") {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Invalid title field: {}", e)))?;
            if !text.trim().is_empty() {
                title = Some(text);
            }
            continue;
        }

        if field.file_name().is_none() {
            continue;
        }

        // First file part wins; later ones are skipped. The loop keeps
        // draining so a title field arriving after the file still applies.
        if stored.is_none() {
            stored = Some(ingest_file_field(&state, field, limit).await?);
        }
    }

    let stored = stored
        .ok_or_else(|| AppError::InvalidInput("Missing video file in upload".to_string()))?;

    let record = match state
        .media
        .create(
            title.unwrap_or_else(|| stored.original_filename.clone()),
            stored.storage_key.clone(),
            ctx.account_id,
            stored.content_type.clone(),
            stored.size_bytes as i64,
        )
        .await
    {
        Ok(record) => record,
        Err(e) => {
            // Transactional creation: never leave a blob without a record.
            if let Err(cleanup_err) = state.storage.delete(&stored.storage_key).await {
                tracing::error!(
                    error = %cleanup_err,
                    storage_key = %stored.storage_key,
                    "Failed to clean up blob after record insert failure"
                );
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        media_id = %record.id,
        owner_id = %ctx.account_id,
        storage_key = %record.storage_key,
        size_bytes = record.size_bytes,
        "Video ingested"
    );

    // Fire-and-continue: respond before processing finishes.
    spawn_processing(state.clone(), record.clone());

    Ok((StatusCode::CREATED, Json(MediaResponse::from(record))))
}

struct StoredUpload {
    storage_key: String,
    original_filename: String,
    content_type: String,
    size_bytes: u64,
}

/// Validate the file part and stream it into storage.
///
/// The byte stream is pumped through a bounded duplex pipe into the storage
/// backend, counting as it goes; an oversize stream aborts the pump, and the
/// partially written blob is deleted before the error returns.
async fn ingest_file_field(
    state: &Arc<AppState>,
    mut field: Field<'_>,
    limit: u64,
) -> Result<StoredUpload, AppError> {
    let original_filename = field
        .file_name()
        .unwrap_or("upload")
        .to_string();
    let content_type = field
        .content_type()
        .ok_or_else(|| AppError::InvalidMediaType("Missing content type".to_string()))?
        .to_string();

    if !content_type.starts_with("video/") {
        return Err(AppError::InvalidMediaType(format!(
            "Only video uploads are allowed, got {}",
            content_type
        )));
    }

    let storage_key = generate_storage_key(&original_filename);

    let (mut writer, reader) = tokio::io::duplex(64 * 1024);

    let pump = async {
        let mut total: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Upload stream error: {}", e)))?
        {
            total += chunk.len() as u64;
            if total > limit {
                return Err(AppError::PayloadTooLarge { size: total, limit });
            }
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to buffer upload: {}", e)))?;
        }
        writer
            .shutdown()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to flush upload: {}", e)))?;
        drop(writer);
        Ok(total)
    };

    let upload = state.storage.upload_stream(&storage_key, Box::pin(reader));
    let (pump_result, upload_result) = tokio::join!(pump, upload);

    let cleanup = |key: String, state: Arc<AppState>| async move {
        if let Err(e) = state.storage.delete(&key).await {
            tracing::error!(error = %e, storage_key = %key, "Failed to remove rejected blob");
        }
    };

    match (pump_result, upload_result) {
        (Ok(_), Ok(size_bytes)) => Ok(StoredUpload {
            storage_key,
            original_filename,
            content_type,
            size_bytes,
        }),
        (Err(e), _) => {
            cleanup(storage_key, state.clone()).await;
            Err(e)
        }
        (_, Err(e)) => {
            cleanup(storage_key, state.clone()).await;
            Err(AppError::Storage(e.to_string()))
        }
    }
}

//! Range-addressable delivery of stored media bytes.
//!
//! Bytes are forwarded chunk by chunk from the storage backend, so memory
//! stays bounded regardless of file size.

use crate::error::{ErrorResponse, HttpAppError};
use crate::range::{parse_range_header, resolve_range, ByteRange};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use clipcast_core::AppError;
use clipcast_storage::ByteStream;
use futures::StreamExt;
use std::sync::Arc;

const FALLBACK_CONTENT_TYPE: &str = "video/mp4";

#[utoipa::path(
    get,
    path = "/api/v0/media/stream/{key}",
    tag = "media",
    params(
        ("key" = String, Path, description = "Storage key of the video"),
        ("Range" = Option<String>, Header, description = "Optional byte range, e.g. bytes=0-1023")
    ),
    responses(
        (status = 200, description = "Full content", content_type = "video/mp4"),
        (status = 206, description = "Partial content", content_type = "video/mp4"),
        (status = 404, description = "No such video", body = ErrorResponse),
        (status = 416, description = "Range not satisfiable", body = ErrorResponse)
    )
)]
pub async fn stream_media(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    // Existence and size check first; no file handle is opened for a miss.
    let total_size = state.storage.content_length(&key).await?;

    // Content type comes from the record when we have it; the key itself is
    // enough to serve bytes.
    let content_type = state
        .media
        .get_by_storage_key(&key)
        .await?
        .map(|record| record.content_type)
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    let range_header = headers.get(header::RANGE).and_then(|h| h.to_str().ok());

    match range_header {
        None => {
            let stream = state.storage.download_stream(&key).await?;
            full_response(stream, total_size, &content_type)
        }
        Some(value) => {
            let range = parse_range_header(value)
                .and_then(|(start, end)| resolve_range(start, end, total_size));

            match range {
                Some(range) => {
                    let stream = state
                        .storage
                        .download_range(&key, range.start, range.length())
                        .await?;
                    partial_response(stream, range, total_size, &content_type)
                }
                // Never serve wrong bytes for a bad range.
                None => Ok(range_not_satisfiable(total_size)),
            }
        }
    }
}

fn body_from(stream: ByteStream) -> Body {
    Body::from_stream(stream.map(|result| result.map_err(std::io::Error::other)))
}

fn full_response(
    stream: ByteStream,
    total_size: u64,
    content_type: &str,
) -> Result<Response, HttpAppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, total_size.to_string())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body_from(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
}

fn partial_response(
    stream: ByteStream,
    range: ByteRange,
    total_size: u64,
    content_type: &str,
) -> Result<Response, HttpAppError> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, range.length().to_string())
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", range.start, range.end, total_size),
        )
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body_from(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
}

/// 416 with the `Content-Range: bytes */<size>` form required by RFC 9110,
/// plus the standard machine-readable error body.
fn range_not_satisfiable(total_size: u64) -> Response {
    let error = AppError::RangeNotSatisfiable(format!(
        "range does not fit a resource of {} bytes",
        total_size
    ));
    let body = serde_json::json!({
        "error": error.client_message(),
        "code": error.error_code(),
    })
    .to_string();

    tracing::debug!(total_size, "Rejected unsatisfiable range request");

    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(header::CONTENT_RANGE, format!("bytes */{}", total_size))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::RANGE_NOT_SATISFIABLE.into_response())
}

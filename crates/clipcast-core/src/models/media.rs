use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// Processing status of an uploaded video.
///
/// Advances `pending -> processing -> completed` and never regresses through
/// the automatic path. `completed` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Pending,
    Processing,
    Completed,
}

impl Display for MediaStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaStatus::Pending => write!(f, "pending"),
            MediaStatus::Processing => write!(f, "processing"),
            MediaStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Moderation verdict attached to a media record.
///
/// Starts `unverified`, set automatically exactly once when processing
/// completes, and may be overridden by an administrator afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Unverified,
    Safe,
    Flagged,
}

impl Display for Classification {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Classification::Unverified => write!(f, "unverified"),
            Classification::Safe => write!(f, "safe"),
            Classification::Flagged => write!(f, "flagged"),
        }
    }
}

/// Durable entity representing one uploaded video and its moderation state.
///
/// `version` is an optimistic-concurrency counter: every write bumps it, and
/// status/classification writes are compare-and-set against the version they
/// read so an administrative override racing an in-flight completion is
/// detected instead of silently lost.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MediaRecord {
    pub id: Uuid,
    pub title: String,
    pub storage_key: String,
    pub owner_id: Uuid,
    pub content_type: String,
    pub size_bytes: i64,
    pub status: MediaStatus,
    pub classification: Classification,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

/// API response shape for a media record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MediaResponse {
    pub id: Uuid,
    pub title: String,
    pub storage_key: String,
    pub owner_id: Uuid,
    pub content_type: String,
    pub size_bytes: i64,
    pub status: MediaStatus,
    pub classification: Classification,
    pub created_at: DateTime<Utc>,
}

impl From<MediaRecord> for MediaResponse {
    fn from(record: MediaRecord) -> Self {
        MediaResponse {
            id: record.id,
            title: record.title,
            storage_key: record.storage_key,
            owner_id: record.owner_id,
            content_type: record.content_type,
            size_bytes: record.size_bytes,
            status: record.status,
            classification: record.classification,
            created_at: record.created_at,
        }
    }
}

/// Lifecycle event pushed to connected clients.
///
/// `classification` is present only once known (the terminal event). These
/// events are a latency optimization; the pull listings remain the source of
/// truth for clients that connect late or miss messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MediaEvent {
    pub id: Uuid,
    pub progress: u8,
    pub status: MediaStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_omits_classification_until_known() {
        let event = MediaEvent {
            id: Uuid::new_v4(),
            progress: 40,
            status: MediaStatus::Processing,
            classification: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("classification").is_none());
        assert_eq!(json["status"], "processing");
        assert_eq!(json["progress"], 40);
    }

    #[test]
    fn terminal_event_carries_classification() {
        let event = MediaEvent {
            id: Uuid::new_v4(),
            progress: 100,
            status: MediaStatus::Completed,
            classification: Some(Classification::Safe),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["classification"], "safe");
        assert_eq!(json["status"], "completed");
    }
}

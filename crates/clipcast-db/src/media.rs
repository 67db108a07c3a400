use chrono::Utc;
use clipcast_core::models::{Classification, MediaRecord, MediaStatus};
use clipcast_core::AppError;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

/// Repository for media records.
///
/// Lifecycle writes are compare-and-set on the `version` column: exactly one
/// driver task owns a record's automatic transitions, but administrative
/// overrides can race it, and a stale write must fail with
/// `ConflictingWrite` rather than clobber a newer state.
#[derive(Clone)]
pub struct MediaRepository {
    pool: SqlitePool,
}

impl MediaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a freshly ingested record (`pending` / `unverified`, version 0).
    pub async fn create(
        &self,
        title: String,
        storage_key: String,
        owner_id: Uuid,
        content_type: String,
        size_bytes: i64,
    ) -> Result<MediaRecord, AppError> {
        let record = sqlx::query_as::<Sqlite, MediaRecord>(
            r#"
            INSERT INTO media (
                id, title, storage_key, owner_id, content_type, size_bytes,
                status, classification, version, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', 'unverified', 0, ?7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&title)
        .bind(&storage_key)
        .bind(owner_id)
        .bind(&content_type)
        .bind(size_bytes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        let record = sqlx::query_as::<Sqlite, MediaRecord>("SELECT * FROM media WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    pub async fn get_by_storage_key(&self, key: &str) -> Result<Option<MediaRecord>, AppError> {
        let record =
            sqlx::query_as::<Sqlite, MediaRecord>("SELECT * FROM media WHERE storage_key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(record)
    }

    /// Public feed: completed and safe, newest first.
    pub async fn list_feed(&self) -> Result<Vec<MediaRecord>, AppError> {
        let records = sqlx::query_as::<Sqlite, MediaRecord>(
            r#"
            SELECT * FROM media
            WHERE status = 'completed' AND classification = 'safe'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// All records owned by one account, whatever their state.
    pub async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<MediaRecord>, AppError> {
        let records = sqlx::query_as::<Sqlite, MediaRecord>(
            "SELECT * FROM media WHERE owner_id = ?1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn list_all(&self) -> Result<Vec<MediaRecord>, AppError> {
        let records =
            sqlx::query_as::<Sqlite, MediaRecord>("SELECT * FROM media ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(records)
    }

    /// Compare-and-set status transition (automatic path).
    pub async fn advance_status(
        &self,
        id: Uuid,
        expected_version: i64,
        status: MediaStatus,
    ) -> Result<MediaRecord, AppError> {
        let record = sqlx::query_as::<Sqlite, MediaRecord>(
            r#"
            UPDATE media SET status = ?3, version = version + 1
            WHERE id = ?1 AND version = ?2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        self.cas_result(id, record).await
    }

    /// Terminal transition: status and classification persist together in one
    /// compare-and-set write, so a record can never be `completed` without a
    /// verdict.
    pub async fn complete(
        &self,
        id: Uuid,
        expected_version: i64,
        classification: Classification,
    ) -> Result<MediaRecord, AppError> {
        let record = sqlx::query_as::<Sqlite, MediaRecord>(
            r#"
            UPDATE media SET status = 'completed', classification = ?3, version = version + 1
            WHERE id = ?1 AND version = ?2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(classification)
        .fetch_optional(&self.pool)
        .await?;

        self.cas_result(id, record).await
    }

    /// Compare-and-set classification override (administrative path).
    /// Leaves `status` untouched.
    pub async fn set_classification(
        &self,
        id: Uuid,
        expected_version: i64,
        classification: Classification,
    ) -> Result<MediaRecord, AppError> {
        let record = sqlx::query_as::<Sqlite, MediaRecord>(
            r#"
            UPDATE media SET classification = ?3, version = version + 1
            WHERE id = ?1 AND version = ?2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(classification)
        .fetch_optional(&self.pool)
        .await?;

        self.cas_result(id, record).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM media WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Disambiguate a missed CAS write: the row either moved on under us
    /// (conflict) or never existed (not found).
    async fn cas_result(
        &self,
        id: Uuid,
        record: Option<MediaRecord>,
    ) -> Result<MediaRecord, AppError> {
        match record {
            Some(record) => Ok(record),
            None => {
                if self.get(id).await?.is_some() {
                    Err(AppError::ConflictingWrite(format!(
                        "media {} was modified concurrently",
                        id
                    )))
                } else {
                    Err(AppError::NotFound(format!("media {} not found", id)))
                }
            }
        }
    }
}

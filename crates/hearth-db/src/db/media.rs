//! Media record repository: queries over the `media` table.

use hearth_core::models::MediaRecord;
use hearth_core::AppError;
use sqlx::{PgPool, Postgres};

/// Repository for media records.
///
/// Records are immutable once inserted; dedup queries run over the
/// `sha256_hash` column.
#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new media record. Fails if `(origin, media_id)` already
    /// exists.
    #[tracing::instrument(skip(self, record), fields(db.table = "media", db.operation = "insert", origin = %record.origin, media_id = %record.media_id))]
    pub async fn insert(&self, record: &MediaRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO media (
                origin, media_id, upload_name, content_type, user_id,
                sha256_hash, size_bytes, datastore_id, location, creation_ts
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&record.origin)
        .bind(&record.media_id)
        .bind(&record.upload_name)
        .bind(&record.content_type)
        .bind(&record.user_id)
        .bind(&record.sha256_hash)
        .bind(record.size_bytes)
        .bind(&record.datastore_id)
        .bind(&record.location)
        .bind(record.creation_ts)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch every record sharing a content hash, oldest first. The oldest
    /// record serves as the clone template for deduplicated uploads.
    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select"))]
    pub async fn get_by_hash(&self, sha256_hash: &str) -> Result<Vec<MediaRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            SELECT origin, media_id, upload_name, content_type, user_id,
                   sha256_hash, size_bytes, datastore_id, location, creation_ts
            FROM media
            WHERE sha256_hash = $1
            ORDER BY creation_ts ASC
            "#,
        )
        .bind(sha256_hash)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Fetch a record by its `(origin, media_id)` identity.
    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select", origin = %origin, media_id = %media_id))]
    pub async fn get_by_id(
        &self,
        origin: &str,
        media_id: &str,
    ) -> Result<Option<MediaRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            SELECT origin, media_id, upload_name, content_type, user_id,
                   sha256_hash, size_bytes, datastore_id, location, creation_ts
            FROM media
            WHERE origin = $1 AND media_id = $2
            "#,
        )
        .bind(origin)
        .bind(media_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

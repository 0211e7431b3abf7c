//! Last-access repository: per-hash access tracking for retention layers.

use hearth_core::AppError;
use sqlx::PgPool;

/// Repository for the `last_access` table. Keyed by content hash, not by
/// media id: all records sharing a blob share one access timestamp.
#[derive(Clone)]
pub struct LastAccessRepository {
    pool: PgPool,
}

impl LastAccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an access at `ts_ms`, inserting or advancing the entry.
    #[tracing::instrument(skip(self), fields(db.table = "last_access", db.operation = "upsert"))]
    pub async fn upsert_last_access(&self, sha256_hash: &str, ts_ms: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO last_access (sha256_hash, last_access_ts)
            VALUES ($1, $2)
            ON CONFLICT (sha256_hash)
            DO UPDATE SET last_access_ts = EXCLUDED.last_access_ts
            "#,
        )
        .bind(sha256_hash)
        .bind(ts_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent access timestamp for a hash, if any.
    #[tracing::instrument(skip(self), fields(db.table = "last_access", db.operation = "select"))]
    pub async fn get_last_access(&self, sha256_hash: &str) -> Result<Option<i64>, AppError> {
        let ts: Option<i64> = sqlx::query_scalar(
            "SELECT last_access_ts FROM last_access WHERE sha256_hash = $1",
        )
        .bind(sha256_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ts)
    }
}

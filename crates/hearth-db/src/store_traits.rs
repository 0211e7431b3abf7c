//! Store trait abstractions for the upload controller
//!
//! These traits define the minimal persistence interface the upload
//! pipeline needs, allowing controller tests to run against in-memory
//! implementations without a database.

use async_trait::async_trait;
use hearth_core::models::MediaRecord;
use hearth_core::AppError;

use crate::db::last_access::LastAccessRepository;
use crate::db::media::MediaRepository;

/// Media record store operations consumed by the upload controller.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Every record sharing a content hash, oldest first.
    async fn get_by_hash(&self, sha256_hash: &str) -> Result<Vec<MediaRecord>, AppError>;

    /// Insert a new record.
    async fn insert(&self, record: &MediaRecord) -> Result<(), AppError>;

    /// Fetch a record by its `(origin, media_id)` identity.
    async fn get_by_id(
        &self,
        origin: &str,
        media_id: &str,
    ) -> Result<Option<MediaRecord>, AppError>;
}

/// Per-hash access tracking consumed by the upload controller.
#[async_trait]
pub trait LastAccessStore: Send + Sync {
    async fn upsert_last_access(&self, sha256_hash: &str, ts_ms: i64) -> Result<(), AppError>;

    async fn get_last_access(&self, sha256_hash: &str) -> Result<Option<i64>, AppError>;
}

// Implementations for the concrete repositories

#[async_trait]
impl MediaStore for MediaRepository {
    async fn get_by_hash(&self, sha256_hash: &str) -> Result<Vec<MediaRecord>, AppError> {
        self.get_by_hash(sha256_hash).await
    }

    async fn insert(&self, record: &MediaRecord) -> Result<(), AppError> {
        self.insert(record).await
    }

    async fn get_by_id(
        &self,
        origin: &str,
        media_id: &str,
    ) -> Result<Option<MediaRecord>, AppError> {
        self.get_by_id(origin, media_id).await
    }
}

#[async_trait]
impl LastAccessStore for LastAccessRepository {
    async fn upsert_last_access(&self, sha256_hash: &str, ts_ms: i64) -> Result<(), AppError> {
        self.upsert_last_access(sha256_hash, ts_ms).await
    }

    async fn get_last_access(&self, sha256_hash: &str) -> Result<Option<i64>, AppError> {
        self.get_last_access(sha256_hash).await
    }
}

//! Media record model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single logical upload, pointing at a physically deduplicated blob.
///
/// Identified by `(origin, media_id)`. Several records may share a
/// `sha256_hash` and point at the same `(datastore_id, location)` pair;
/// in that case they also share `size_bytes`, while every other attribute
/// carries the provenance of its own upload. `sha256_hash` and `size_bytes`
/// are immutable once the record is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MediaRecord {
    /// Origin (homeserver name) the media was uploaded to.
    pub origin: String,
    /// 64-character random identifier, unique per origin.
    pub media_id: String,
    /// Original filename as declared by the uploader.
    pub upload_name: String,
    /// Content type as declared by the uploader. Advisory; admission runs
    /// on the sniffed type.
    pub content_type: String,
    /// Uploader identity, or the empty-string sentinel for system persists.
    pub user_id: String,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256_hash: String,
    /// File size in bytes; always > 0 for persisted records.
    pub size_bytes: i64,
    /// Identifier of the datastore holding the blob.
    pub datastore_id: String,
    /// Storage key within the datastore.
    pub location: String,
    /// Creation timestamp, milliseconds since epoch.
    pub creation_ts: i64,
}

//! Upload controller: orchestrates persist, sniff, admit, hash, and
//! reconciliation against existing media records.
//!
//! The controller owns the persisted temp file between persist and
//! reconciliation. Every temp file ends Deleted, Promoted (renamed onto an
//! existing record's blob path), or Abandoned (target already present, temp
//! deleted); failure paths after persist delete it before returning.

use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use hearth_core::constants::NO_APPLICABLE_UPLOAD_USER;
use hearth_core::models::MediaRecord;
use hearth_core::{clock, ids, AppError, UploadsConfig};
use hearth_db::{LastAccessStore, MediaStore};
use hearth_storage::DatastoreSet;
use tokio::fs;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use crate::limits;
use crate::policy;

/// Orchestrates media uploads against the datastore facade and the media
/// and last-access stores.
///
/// Holds no mutable state of its own; all shared state lives behind the
/// stores, so one controller serves any number of concurrent uploads.
#[derive(Clone)]
pub struct UploadController {
    uploads: UploadsConfig,
    datastores: Arc<DatastoreSet>,
    media: Arc<dyn MediaStore>,
    last_access: Arc<dyn LastAccessStore>,
}

impl UploadController {
    pub fn new(
        uploads: UploadsConfig,
        datastores: Arc<DatastoreSet>,
        media: Arc<dyn MediaStore>,
        last_access: Arc<dyn LastAccessStore>,
    ) -> Self {
        Self {
            uploads,
            datastores,
            media,
            last_access,
        }
    }

    /// Accept an upload stream and store it under a freshly generated media
    /// id.
    ///
    /// The stream is capped at the configured maximum size and is consumed
    /// (and dropped) before this returns, regardless of outcome.
    #[tracing::instrument(skip(self, stream, token), fields(origin = %origin, user_id = %user_id))]
    pub async fn upload_media(
        &self,
        stream: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        content_type: &str,
        filename: &str,
        user_id: &str,
        origin: &str,
        token: &CancellationToken,
    ) -> Result<MediaRecord, AppError> {
        let data = limits::limit_stream(stream, self.uploads.max_size_bytes);
        let media_id = ids::generate_media_id();

        self.store_direct(data, content_type, filename, user_id, origin, &media_id, token)
            .await
    }

    /// Persist a byte stream under the given media id, reconciling against
    /// existing records with the same content hash.
    #[tracing::instrument(skip(self, reader, token), fields(origin = %origin, media_id = %media_id, user_id = %user_id))]
    #[allow(clippy::too_many_arguments)]
    pub async fn store_direct(
        &self,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        content_type: &str,
        filename: &str,
        user_id: &str,
        origin: &str,
        media_id: &str,
        token: &CancellationToken,
    ) -> Result<MediaRecord, AppError> {
        let datastore = self.datastores.pick();
        let location = datastore.persist_stream(reader, token).await?;
        let file_location = match datastore.resolve(&location) {
            Ok(path) => path,
            Err(e) => return Err(e.into()),
        };

        if token.is_cancelled() {
            remove_temp_file(&file_location).await;
            return Err(AppError::Cancelled);
        }

        let file_mime = match hearth_storage::mime::sniff_mime(&file_location).await {
            Ok(mime) => mime,
            Err(e) => {
                tracing::error!(error = %e, "Error while checking content type of file");
                remove_temp_file(&file_location).await;
                return Err(e.into());
            }
        };

        if !policy::is_allowed(&file_mime, content_type, user_id, &self.uploads) {
            tracing::warn!(
                sniffed = %file_mime,
                reported = %content_type,
                "Content type is not allowed to be uploaded"
            );
            remove_temp_file(&file_location).await;
            return Err(AppError::MediaNotAllowed {
                sniffed: file_mime,
                reported: content_type.to_string(),
            });
        }

        let hash = match hearth_storage::hash::sha256_file(&file_location).await {
            Ok(hash) => hash,
            Err(e) => {
                remove_temp_file(&file_location).await;
                return Err(e.into());
            }
        };

        if token.is_cancelled() {
            remove_temp_file(&file_location).await;
            return Err(AppError::Cancelled);
        }

        let records = match self.media.get_by_hash(&hash).await {
            Ok(records) => records,
            Err(e) => {
                remove_temp_file(&file_location).await;
                return Err(e);
            }
        };

        if !records.is_empty() {
            tracing::info!(sha256_hash = %hash, "Duplicate media for hash");

            // A real user re-uploading identical bytes with identical
            // declared type and origin gets their existing record back.
            if user_id != NO_APPLICABLE_UPLOAD_USER {
                if let Some(existing) = records.iter().find(|r| {
                    r.user_id == user_id && r.origin == origin && r.content_type == content_type
                }) {
                    tracing::info!(
                        "User has already uploaded this media before - returning unaltered media record"
                    );
                    remove_temp_file(&file_location).await;
                    self.track_upload_as_last_access(&existing.sha256_hash).await;
                    return Ok(existing.clone());
                }
            }

            // Clone the first record: fresh identity and provenance, shared
            // physical bytes.
            let template = &records[0];
            let record = MediaRecord {
                origin: origin.to_string(),
                media_id: media_id.to_string(),
                upload_name: filename.to_string(),
                content_type: content_type.to_string(),
                user_id: user_id.to_string(),
                sha256_hash: template.sha256_hash.clone(),
                size_bytes: template.size_bytes,
                datastore_id: template.datastore_id.clone(),
                location: template.location.clone(),
                creation_ts: clock::now_millis(),
            };

            if let Err(e) = self.media.insert(&record).await {
                remove_temp_file(&file_location).await;
                return Err(e);
            }

            // If the template's blob exists, the temp file is redundant.
            // If it doesn't (or the check fails), promote the temp file onto
            // the template's path.
            let target_path = match self.datastores.resolve(&record.datastore_id, &record.location)
            {
                Ok(path) => path,
                Err(e) => {
                    remove_temp_file(&file_location).await;
                    return Err(e.into());
                }
            };
            let exists = fs::try_exists(&target_path).await.unwrap_or(false);
            if exists {
                remove_temp_file(&file_location).await;
            } else if let Err(e) = fs::rename(&file_location, &target_path).await {
                tracing::warn!(
                    from = %file_location.display(),
                    to = %target_path.display(),
                    error = %e,
                    "Failed to promote temp file onto existing media location"
                );
            }

            self.track_upload_as_last_access(&record.sha256_hash).await;
            return Ok(record);
        }

        // The media doesn't already exist - save it as new

        let size_bytes = match fs::metadata(&file_location).await {
            Ok(meta) => meta.len() as i64,
            Err(e) => {
                remove_temp_file(&file_location).await;
                return Err(e.into());
            }
        };

        if size_bytes <= 0 {
            remove_temp_file(&file_location).await;
            return Err(AppError::MediaEmpty);
        }

        tracing::info!("Persisting new media record");

        let record = MediaRecord {
            origin: origin.to_string(),
            media_id: media_id.to_string(),
            upload_name: filename.to_string(),
            content_type: content_type.to_string(),
            user_id: user_id.to_string(),
            sha256_hash: hash,
            size_bytes,
            datastore_id: datastore.datastore_id().to_string(),
            location,
            creation_ts: clock::now_millis(),
        };

        if let Err(e) = self.media.insert(&record).await {
            remove_temp_file(&file_location).await;
            return Err(e);
        }

        self.track_upload_as_last_access(&record.sha256_hash).await;
        Ok(record)
    }

    /// Record the upload as an access for its hash. Best-effort: failures
    /// are logged and never fail the upload.
    async fn track_upload_as_last_access(&self, sha256_hash: &str) {
        if let Err(e) = self
            .last_access
            .upsert_last_access(sha256_hash, clock::now_millis())
            .await
        {
            tracing::warn!(error = %e, "Failed to upsert the last access time");
        }
    }
}

/// Delete a temp file on a non-promotion exit path. Removal failures are
/// logged and swallowed; the caller's original error stays the cause.
async fn remove_temp_file(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove temporary upload file"
        );
    }
}

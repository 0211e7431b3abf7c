use crate::traits::{Datastore, DatastoreError, DatastoreResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Local filesystem datastore
#[derive(Clone)]
pub struct LocalDatastore {
    id: String,
    base_path: PathBuf,
}

impl LocalDatastore {
    /// # Arguments
    /// * `id` - Stable datastore identifier recorded on media records
    /// * `base_path` - Root directory for blob storage (e.g., "/var/lib/hearth/media")
    pub async fn new(id: String, base_path: impl Into<PathBuf>) -> DatastoreResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            DatastoreError::ConfigError(format!(
                "Failed to create datastore directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalDatastore { id, base_path })
    }

    /// Generate a fresh sharded location key (`ab/cd/<rest>` from 32 random
    /// hex characters). Uniqueness per call is required by the upload
    /// pipeline's temp-file ownership model.
    fn generate_location() -> String {
        let key = Uuid::new_v4().simple().to_string();
        format!("{}/{}/{}", &key[..2], &key[2..4], &key[4..])
    }
}

#[async_trait]
impl Datastore for LocalDatastore {
    fn datastore_id(&self) -> &str {
        &self.id
    }

    async fn persist_stream(
        &self,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        token: &CancellationToken,
    ) -> DatastoreResult<String> {
        let location = Self::generate_location();
        let path = self.resolve(&location)?;
        let start = std::time::Instant::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&path).await.map_err(|e| {
            tracing::error!(path = %path.display(), location = %location, error = %e, "Datastore persist create failed");
            DatastoreError::PersistFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let copy_result = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            res = tokio::io::copy(&mut reader, &mut file) => Some(res),
        };

        let bytes_copied = match copy_result {
            None => {
                let _ = fs::remove_file(&path).await;
                tracing::debug!(location = %location, "Datastore persist cancelled");
                return Err(DatastoreError::Cancelled);
            }
            Some(Err(e)) => {
                let _ = fs::remove_file(&path).await;
                tracing::error!(path = %path.display(), location = %location, error = %e, "Datastore persist write failed");
                return Err(DatastoreError::PersistFailed(format!(
                    "Failed to write stream to file {}: {}",
                    path.display(),
                    e
                )));
            }
            Some(Ok(n)) => n,
        };

        if let Err(e) = file.sync_all().await {
            let _ = fs::remove_file(&path).await;
            tracing::error!(path = %path.display(), location = %location, error = %e, "Datastore persist sync failed");
            return Err(DatastoreError::PersistFailed(format!(
                "Failed to sync file {}: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            datastore_id = %self.id,
            location = %location,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Datastore persist successful"
        );

        Ok(location)
    }

    fn resolve(&self, location: &str) -> DatastoreResult<PathBuf> {
        if location.is_empty()
            || location.starts_with('/')
            || Path::new(location)
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(DatastoreError::InvalidLocation(location.to_string()));
        }
        Ok(self.base_path.join(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn reader(data: &[u8]) -> Pin<Box<dyn AsyncRead + Send + Unpin>> {
        Box::pin(Cursor::new(data.to_vec()))
    }

    #[tokio::test]
    async fn test_persist_and_resolve() {
        let dir = tempdir().unwrap();
        let store = LocalDatastore::new("default".to_string(), dir.path())
            .await
            .unwrap();

        let token = CancellationToken::new();
        let location = store
            .persist_stream(reader(b"persisted bytes"), &token)
            .await
            .unwrap();

        let path = store.resolve(&location).unwrap();
        assert_eq!(fs::read(&path).await.unwrap(), b"persisted bytes");
    }

    #[tokio::test]
    async fn test_locations_are_unique_and_sharded() {
        let dir = tempdir().unwrap();
        let store = LocalDatastore::new("default".to_string(), dir.path())
            .await
            .unwrap();

        let token = CancellationToken::new();
        let a = store.persist_stream(reader(b"x"), &token).await.unwrap();
        let b = store.persist_stream(reader(b"x"), &token).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(a.split('/').count(), 3);
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let dir = tempdir().unwrap();
        let store = LocalDatastore::new("default".to_string(), dir.path())
            .await
            .unwrap();

        assert!(matches!(
            store.resolve("../../../etc/passwd"),
            Err(DatastoreError::InvalidLocation(_))
        ));
        assert!(matches!(
            store.resolve("/etc/passwd"),
            Err(DatastoreError::InvalidLocation(_))
        ));
        assert!(matches!(
            store.resolve("ab/../cd"),
            Err(DatastoreError::InvalidLocation(_))
        ));
        assert!(matches!(
            store.resolve(""),
            Err(DatastoreError::InvalidLocation(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_persist_cleans_up() {
        let dir = tempdir().unwrap();
        let store = LocalDatastore::new("default".to_string(), dir.path())
            .await
            .unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let result = store.persist_stream(reader(b"never written"), &token).await;
        assert!(matches!(result, Err(DatastoreError::Cancelled)));

        // No partial files may remain.
        let mut entries = Vec::new();
        let mut stack = vec![dir.path().to_path_buf()];
        while let Some(p) = stack.pop() {
            let mut rd = fs::read_dir(&p).await.unwrap();
            while let Some(entry) = rd.next_entry().await.unwrap() {
                if entry.file_type().await.unwrap().is_dir() {
                    stack.push(entry.path());
                } else {
                    entries.push(entry.path());
                }
            }
        }
        assert!(entries.is_empty(), "leftover files: {entries:?}");
    }
}

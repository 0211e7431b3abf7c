//! Datastore abstraction trait
//!
//! This module defines the `Datastore` trait that all backing stores must
//! implement, and the error type shared by storage operations.

use async_trait::async_trait;
use hearth_core::AppError;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum DatastoreError {
    #[error("Persist failed: {0}")]
    PersistFailed(String),

    #[error("Unknown datastore: {0}")]
    UnknownDatastore(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type for datastore operations
pub type DatastoreResult<T> = Result<T, DatastoreError>;

impl From<DatastoreError> for AppError {
    fn from(err: DatastoreError) -> Self {
        match err {
            DatastoreError::Cancelled => AppError::Cancelled,
            DatastoreError::IoError(e) => AppError::Io(e),
            other => AppError::Datastore(other.to_string()),
        }
    }
}

/// Datastore abstraction trait
///
/// A datastore persists an incoming byte stream under a fresh opaque
/// location and resolves locations back to filesystem paths the upload
/// pipeline can sniff, hash, rename, and remove. The upload controller
/// treats both the datastore id and the location as opaque.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Stable identifier of this datastore, recorded on media records.
    fn datastore_id(&self) -> &str;

    /// Consume `reader` to completion into a freshly generated location and
    /// return that location key.
    ///
    /// The write is cancellable through `token`; a cancelled or failed
    /// persist cleans up its own partial file before returning.
    async fn persist_stream(
        &self,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        token: &CancellationToken,
    ) -> DatastoreResult<String>;

    /// Resolve a location to an absolute filesystem path.
    fn resolve(&self, location: &str) -> DatastoreResult<PathBuf>;
}

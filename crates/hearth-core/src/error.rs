//! Error types module
//!
//! All errors in the upload pipeline are unified under the `AppError` enum,
//! which can represent database, datastore, policy, and IO failures. The
//! `ErrorMetadata` trait lets a transport layer map errors to responses
//! without matching on variants.

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like rejected uploads
    Debug,
    /// Warning level - for recoverable or policy-driven issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
pub trait ErrorMetadata {
    /// HTTP status code a transport layer should return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MEDIA_NOT_ALLOWED")
    fn error_code(&self) -> &'static str;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Datastore error: {0}")]
    Datastore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Content type {sniffed} (reported as {reported}) is not allowed")]
    MediaNotAllowed { sniffed: String, reported: String },

    #[error("file has no contents")]
    MediaEmpty,

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

/// Static metadata per variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::Database(_) => (500, "DATABASE_ERROR", LogLevel::Error),
        AppError::Datastore(_) => (500, "DATASTORE_ERROR", LogLevel::Error),
        AppError::Io(_) => (500, "IO_ERROR", LogLevel::Error),
        AppError::MediaNotAllowed { .. } => (415, "MEDIA_NOT_ALLOWED", LogLevel::Warn),
        AppError::MediaEmpty => (400, "MEDIA_EMPTY", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Debug),
        AppError::Cancelled => (499, "CANCELLED", LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Datastore(_) => "Failed to access storage".to_string(),
            AppError::Io(_) => "Storage operation failed".to_string(),
            AppError::MediaNotAllowed { .. } => self.to_string(),
            AppError::MediaEmpty => self.to_string(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Cancelled => "Request cancelled".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

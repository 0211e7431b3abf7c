//! Hearth Database Library
//!
//! Persistence layer for the media repository: the media record store and
//! the per-hash last-access store, plus the trait seams the upload
//! controller consumes so it can be tested without a database.

pub mod db;
pub mod store_traits;

use hearth_core::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

// Re-export commonly used types
pub use db::{LastAccessRepository, MediaRepository};
pub use store_traits::{LastAccessStore, MediaStore};

/// Connect to Postgres with the configured pool limits.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    timeout_seconds: u64,
) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(timeout_seconds))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;
    Ok(())
}

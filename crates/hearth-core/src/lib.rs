//! Hearth Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! small shared utilities (identifier generation, clock, telemetry init)
//! used by all Hearth components.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod models;
pub mod telemetry;

// Re-export commonly used types
pub use config::{HearthConfig, PerUserAllowance, UploadsConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::MediaRecord;

//! Hearth Upload Library
//!
//! The upload ingestion and deduplication pipeline: size enforcement on
//! streaming input, content-type admission policy, content-addressed
//! persistence through the datastore facade, and reconciliation of new
//! uploads against existing media records so duplicate bytes are stored
//! once while every logical upload stays independently addressable.

pub mod controller;
pub mod limits;
pub mod policy;
pub mod test_support;

// Re-export commonly used types
pub use controller::UploadController;
pub use limits::is_request_too_large;
pub use policy::is_allowed;

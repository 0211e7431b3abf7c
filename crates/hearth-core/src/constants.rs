//! Shared constants.

/// Sentinel user id for system-initiated persists (no applicable user).
/// Uploads carrying this user id skip per-user admission policy.
pub const NO_APPLICABLE_UPLOAD_USER: &str = "";

/// Length of generated media identifiers.
pub const MEDIA_ID_LENGTH: usize = 64;

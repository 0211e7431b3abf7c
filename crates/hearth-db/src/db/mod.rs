//! Database repositories for the data access layer
//!
//! Each repository is responsible for a single table and provides the
//! queries the upload pipeline and retention layers need.

pub mod last_access;
pub mod media;

pub use last_access::LastAccessRepository;
pub use media::MediaRepository;

//! Upload size enforcement.
//!
//! Two layers: a pre-flight predicate over the declared request size, and a
//! hard cap on the byte stream itself. The predicate is the primary
//! defense; the stream cap means the datastore never sees more than the
//! configured maximum even when the declared size lied.

use hearth_core::UploadsConfig;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Decide from the declared request size whether an upload is too large to
/// accept.
///
/// * Enforcement disabled (`max_size_bytes <= 0`): never too large.
/// * A known non-negative `content_length` is compared directly.
/// * Otherwise a present `Content-Length` header string is parsed; a value
///   that does not parse is treated as too large.
/// * With neither available the decision is deferred to the stream cap.
pub fn is_request_too_large(
    content_length: Option<i64>,
    content_length_header: Option<&str>,
    config: &UploadsConfig,
) -> bool {
    if config.max_size_bytes <= 0 {
        return false;
    }

    if let Some(length) = content_length {
        if length >= 0 {
            return length > config.max_size_bytes;
        }
    }

    if let Some(header) = content_length_header {
        if !header.is_empty() {
            return match header.trim().parse::<i64>() {
                Ok(parsed) => parsed > config.max_size_bytes,
                Err(_) => {
                    tracing::warn!(
                        header = %header,
                        "Invalid content length header given; assuming too large"
                    );
                    true
                }
            };
        }
    }

    false
}

/// Cap a byte stream at the configured maximum. With enforcement disabled
/// the stream passes through unchanged; otherwise the downstream reader
/// sees EOF at the boundary.
pub fn limit_stream(
    reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    max_size_bytes: i64,
) -> Pin<Box<dyn AsyncRead + Send + Unpin>> {
    if max_size_bytes > 0 {
        Box::pin(reader.take(max_size_bytes as u64))
    } else {
        reader
    }
}

//! Content type detection from file bytes.

use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Fallback for content whose magic bytes match no known signature.
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

/// Header window handed to the magic-byte matcher. Large enough for every
/// signature `infer` knows about.
const SNIFF_WINDOW: usize = 8192;

/// Detect the content type of a file from its leading bytes.
///
/// Returns `application/octet-stream` for unrecognized content; only read
/// failures surface as errors.
pub async fn sniff_mime(path: &Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path).await?;
    let mut header = vec![0u8; SNIFF_WINDOW];
    let mut filled = 0;

    while filled < header.len() {
        let n = file.read(&mut header[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    header.truncate(filled);

    Ok(infer::get(&header)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| APPLICATION_OCTET_STREAM.to_string()))
}

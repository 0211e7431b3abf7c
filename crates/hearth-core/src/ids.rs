//! Random identifier generation.

use rand::Rng;

use crate::constants::MEDIA_ID_LENGTH;

/// Alphanumeric alphabet with the easily-confused characters
/// (`I`, `O`, `l`, `0`, `1`) removed.
const MEDIA_ID_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

/// Generate a random string of `len` characters over the media id alphabet.
///
/// Uses the thread-local CSPRNG.
pub fn random_string(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..MEDIA_ID_ALPHABET.len());
            MEDIA_ID_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a fresh media identifier (64 characters).
pub fn generate_media_id() -> String {
    random_string(MEDIA_ID_LENGTH)
}

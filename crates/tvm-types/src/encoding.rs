//! Base64 helpers.
//!
//! Used by the get-method value codec, so that every persisted byte string
//! uses the same alphabet.

use base64::Engine;

/// Encode bytes to a standard-alphabet base64 string.
pub fn base64_encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode a standard-alphabet base64 string, returning None on failure.
pub fn try_base64_decode(b64: &str) -> Option<Vec<u8>> {
    base64::engine::general_purpose::STANDARD.decode(b64).ok()
}

//! Hexadecimal helpers for fixed-size byte values.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("expected {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid hex character {c:?} at position {index}")]
    InvalidCharacter { c: char, index: usize },
}

/// True if `s` is exactly `byte_len` bytes of hex (either case).
pub fn is_valid_hex(s: &str, byte_len: usize) -> bool {
    s.len() == byte_len * 2 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decode a hex string into exactly `N` bytes.
pub fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], HexError> {
    if !is_valid_hex(s, N) {
        return Err(explain(s, N));
    }
    let mut out = [0u8; N];
    ::hex::decode_to_slice(s, &mut out).map_err(|_| explain(s, N))?;
    Ok(out)
}

/// Why `s` is not `byte_len` bytes of hex. Length is reported before content.
fn explain(s: &str, byte_len: usize) -> HexError {
    if s.len() != byte_len * 2 {
        return HexError::InvalidLength {
            expected: byte_len * 2,
            actual: s.len(),
        };
    }
    match s.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        Some((index, c)) => HexError::InvalidCharacter { c, index },
        None => HexError::InvalidLength {
            expected: byte_len * 2,
            actual: s.len(),
        },
    }
}

/// Lowercase hex encoding.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    ::hex::encode(bytes)
}

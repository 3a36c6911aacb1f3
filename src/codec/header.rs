//! Fixed-width header block
//!
//! The header carries a string-to-string map as compact JSON, NUL-padded to
//! exactly `HEADER_SIZE` bytes:
//!
//! ```text
//! +------------------------------+------------------+
//! | {"size":"24"}                | 0x00 ... 0x00    |
//! +------------------------------+------------------+
//! |<-------------------- HEADER_SIZE -------------->|
//! ```
//!
//! Keys are ordered (BTreeMap), so the same map always encodes to the same
//! bytes. An encoded map that does not fit is rejected, never truncated.

use std::collections::BTreeMap;

use super::errors::{CodecError, CodecResult};

/// Width of the header block in bytes
pub const HEADER_SIZE: usize = 4088;

/// Header key holding the decimal payload length
pub const SIZE_KEY: &str = "size";

/// Metadata map stored in the header block
pub type HeaderMap = BTreeMap<String, String>;

/// Encode `map` into a full header block.
pub fn encode_header(map: &HeaderMap) -> CodecResult<Vec<u8>> {
    let json = serde_json::to_vec(map)
        .map_err(|e| CodecError::header_corrupt(format!("Failed to encode header: {}", e)))?;

    if json.len() > HEADER_SIZE {
        return Err(CodecError::header_overflow(json.len(), HEADER_SIZE));
    }

    let mut block = json;
    block.resize(HEADER_SIZE, 0);
    Ok(block)
}

/// Decode a header block produced by [`encode_header`].
pub fn decode_header(block: &[u8]) -> CodecResult<HeaderMap> {
    if block.len() != HEADER_SIZE {
        return Err(CodecError::header_corrupt(format!(
            "Header block is {} bytes, expected {}",
            block.len(),
            HEADER_SIZE
        )));
    }

    let end = block.iter().position(|&b| b == 0).unwrap_or(block.len());
    let (text, padding) = block.split_at(end);

    if padding.iter().any(|&b| b != 0) {
        return Err(CodecError::header_corrupt(
            "Non-zero bytes in header padding",
        ));
    }

    serde_json::from_slice(text)
        .map_err(|e| CodecError::header_corrupt(format!("Invalid header: {}", e)))
}

/// Extract the payload byte length stored under `"size"`.
pub fn header_size_field(map: &HeaderMap) -> CodecResult<u64> {
    let raw = map
        .get(SIZE_KEY)
        .ok_or_else(|| CodecError::header_corrupt("Header is missing key 'size'"))?;

    // u64::from_str accepts a leading '+'; the writer never emits one.
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::header_corrupt(format!(
            "Header 'size' is not a decimal number: {:?}",
            raw
        )));
    }

    raw.parse::<u64>()
        .map_err(|e| CodecError::header_corrupt(format!("Header 'size' out of range: {}", e)))
}

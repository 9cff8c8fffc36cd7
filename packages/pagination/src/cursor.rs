//! Opaque cursor encoding and decoding
//!
//! Cursors are `base64(tag ':' payload)`. Position cursors use the
//! `arrayconnection` tag with a decimal row index; keyset cursors use the
//! `keyset` tag with a JSON array of sort-column values. The tag makes
//! the two kinds distinguishable on decode, so a position cursor is never
//! silently misread as a keyset cursor.
//!
//! Decoding is total: malformed input, a wrong tag, or an undecodable
//! payload all yield `None`, never a panic.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use graphloom_core::ScalarValue;

use crate::error::{PaginationError, PaginationResult};

/// Tag for position (offset) cursors, matching the historical
/// `arrayconnection` wire format
const POSITION_TAG: &str = "arrayconnection";

/// Tag for keyset cursors
const KEYSET_TAG: &str = "keyset";

/// Encode a zero-based row offset as an opaque position cursor
pub fn encode_position(offset: u64) -> String {
    BASE64.encode(format!("{}:{}", POSITION_TAG, offset))
}

/// Decode a position cursor back to its row offset
///
/// Returns `None` for malformed input or a cursor of another kind.
pub fn decode_position(cursor: &str) -> Option<u64> {
    let payload = decode_tagged(cursor, POSITION_TAG)?;
    payload.parse().ok()
}

/// Encode the sort-column values of a row as an opaque keyset cursor
pub fn encode_keyset(values: &[ScalarValue]) -> PaginationResult<String> {
    let payload = serde_json::to_string(values)
        .map_err(|err| PaginationError::CursorEncode(err.to_string()))?;
    Ok(BASE64.encode(format!("{}:{}", KEYSET_TAG, payload)))
}

/// Decode a keyset cursor back to its sort-column values
///
/// Returns `None` for malformed input or a cursor of another kind.
pub fn decode_keyset(cursor: &str) -> Option<Vec<ScalarValue>> {
    let payload = decode_tagged(cursor, KEYSET_TAG)?;
    serde_json::from_str(&payload).ok()
}

/// Base64-decode a cursor and strip the expected tag prefix
fn decode_tagged(cursor: &str, tag: &str) -> Option<String> {
    let raw = BASE64.decode(cursor).ok()?;
    let text = String::from_utf8(raw).ok()?;
    let (found_tag, payload) = text.split_once(':')?;
    if found_tag != tag {
        return None;
    }
    Some(payload.to_string())
}

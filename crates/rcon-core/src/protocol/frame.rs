//! Binary codec for the length-prefixed RCON frame.
//!
//! Wire format:
//! ```text
//! [length:4 LE][request_id:4 LE][kind:4 LE][body:N UTF-8][0x00 0x00]
//! ```
//! The length field counts every byte after itself: request id, kind, body,
//! and the two-byte terminator. All integers are little-endian signed 32-bit.
//!
//! Frame kinds other than [`AUTH`] and [`EXEC_COMMAND`] are carried as raw
//! values; the protocol variant targeted here defines no further semantics
//! and this codec does not invent any.

use thiserror::Error;

/// Authentication request; body is the RCON password.
pub const AUTH: i32 = 3;

/// Command execution request, and the kind most servers echo on responses.
pub const EXEC_COMMAND: i32 = 2;

/// Empty/padding response kind seen from some server variants.
pub const RESPONSE_VALUE: i32 = 0;

/// Request id a server places on a response to signal a rejected password.
pub const AUTH_FAILED_SENTINEL: i32 = -1;

/// Size of the length prefix on the wire.
pub const HEADER_LEN: usize = 4;

/// Every frame ends with exactly these two bytes.
pub const TERMINATOR: [u8; 2] = [0x00, 0x00];

/// Sanity ceiling on the declared payload length. A desynchronised stream
/// tends to produce wild length values; anything above this is treated as a
/// protocol error rather than an allocation request.
pub const MAX_FRAME_LEN: i32 = 4 * 1024 * 1024;

/// Request id (4) + kind (4) + terminator (2): the smallest legal payload.
const MIN_PAYLOAD_LEN: usize = 10;

/// Errors produced while encoding or decoding frames.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The length prefix is negative or exceeds [`MAX_FRAME_LEN`].
    #[error("implausible frame length {0} (limit {MAX_FRAME_LEN})")]
    InvalidLength(i32),

    /// The payload is shorter than the fixed fields require.
    #[error("truncated payload: need at least {needed} bytes, got {available}")]
    TruncatedPayload { needed: usize, available: usize },

    /// The final two bytes of the payload are not `00 00`.
    #[error("bad frame terminator: {0:02X} {1:02X}")]
    BadTerminator(u8, u8),
}

/// One decoded frame.
///
/// The body is UTF-8 text; invalid sequences arriving from the server are
/// replaced rather than rejected, since frames are decoded whole and a split
/// multi-byte character cannot occur at a frame boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub request_id: i32,
    pub kind: i32,
    pub body: String,
}

/// Encodes a complete frame, length prefix included.
///
/// # Examples
///
/// ```rust
/// use rcon_core::{encode, decode_header, decode_payload, EXEC_COMMAND};
///
/// let bytes = encode(7, EXEC_COMMAND, "ListPlayers");
/// let len = decode_header(bytes[..4].try_into().unwrap()).unwrap();
/// let frame = decode_payload(&bytes[4..4 + len]).unwrap();
/// assert_eq!(frame.request_id, 7);
/// assert_eq!(frame.body, "ListPlayers");
/// ```
pub fn encode(request_id: i32, kind: i32, body: &str) -> Vec<u8> {
    let payload_len = 4 + 4 + body.len() + TERMINATOR.len();
    let mut buf = Vec::with_capacity(HEADER_LEN + payload_len);

    buf.extend_from_slice(&(payload_len as i32).to_le_bytes());
    buf.extend_from_slice(&request_id.to_le_bytes());
    buf.extend_from_slice(&kind.to_le_bytes());
    buf.extend_from_slice(body.as_bytes());
    buf.extend_from_slice(&TERMINATOR);
    buf
}

/// Interprets the 4-byte length prefix, returning the payload length to read.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidLength`] for negative lengths, lengths
/// above [`MAX_FRAME_LEN`], and lengths too small to hold the fixed fields.
pub fn decode_header(header: [u8; HEADER_LEN]) -> Result<usize, ProtocolError> {
    let len = i32::from_le_bytes(header);
    if len < MIN_PAYLOAD_LEN as i32 || len > MAX_FRAME_LEN {
        return Err(ProtocolError::InvalidLength(len));
    }
    Ok(len as usize)
}

/// Decodes a payload (everything after the length prefix) into a [`Frame`].
///
/// # Errors
///
/// Returns [`ProtocolError::TruncatedPayload`] if the slice cannot hold the
/// fixed fields, or [`ProtocolError::BadTerminator`] if the final two bytes
/// are not `00 00`.
pub fn decode_payload(payload: &[u8]) -> Result<Frame, ProtocolError> {
    if payload.len() < MIN_PAYLOAD_LEN {
        return Err(ProtocolError::TruncatedPayload {
            needed: MIN_PAYLOAD_LEN,
            available: payload.len(),
        });
    }

    let request_id = i32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let kind = i32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]);

    let body_end = payload.len() - TERMINATOR.len();
    let terminator = &payload[body_end..];
    if terminator != TERMINATOR {
        return Err(ProtocolError::BadTerminator(terminator[0], terminator[1]));
    }

    let body = String::from_utf8_lossy(&payload[8..body_end]).into_owned();
    Ok(Frame {
        request_id,
        kind,
        body,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

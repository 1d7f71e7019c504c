//! # rcon-core
//!
//! Wire-level building blocks for the Source-style RCON protocol spoken by
//! ARK and similar game servers: the length-prefixed binary frame codec and
//! the request-id allocator.
//!
//! This crate has zero dependencies on sockets or an async runtime. It is
//! used by the `rcon-client` connection layer and by test harnesses that
//! fake the server side of the exchange.
//!
//! # Wire format
//!
//! ```text
//! int32 length_LE | int32 request_id_LE | int32 kind_LE | body (UTF-8) | 0x00 0x00
//! ```
//!
//! The length prefix covers everything after itself. Frame kind `3` is the
//! authentication request (body = password), kind `2` is command execution
//! (body = command text on the way out, result text on the way back).
//! A response carrying request id `-1` signals an authentication failure.

pub mod protocol;

// Re-export the most-used items at the crate root so callers can write
// `rcon_core::encode` instead of `rcon_core::protocol::frame::encode`.
pub use protocol::frame::{
    decode_header, decode_payload, encode, Frame, ProtocolError, AUTH, AUTH_FAILED_SENTINEL,
    EXEC_COMMAND, HEADER_LEN, MAX_FRAME_LEN, RESPONSE_VALUE, TERMINATOR,
};
pub use protocol::request_id::RequestIdCounter;

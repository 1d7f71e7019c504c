//! Protocol layer: frame codec and request-id allocation.

pub mod frame;
pub mod request_id;

pub use frame::{decode_header, decode_payload, encode, Frame, ProtocolError};
pub use request_id::RequestIdCounter;

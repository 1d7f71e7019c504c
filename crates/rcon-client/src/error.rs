//! Client error taxonomy.
//!
//! The codec and connection layers raise these; the session layer re-raises
//! after guaranteeing the socket is closed; only the poller in the
//! application crate catches, classifies, and applies cooldown.

use std::io;

use rcon_core::ProtocolError;

/// Client result type.
pub type Result<T> = std::result::Result<T, RconError>;

/// Errors that can occur while talking to an RCON server.
#[derive(Debug, thiserror::Error)]
pub enum RconError {
    /// The TCP connection could not be established (refused, unreachable,
    /// DNS failure).
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Connect or call did not complete within the caller's deadline.
    #[error("operation timed out")]
    Timeout,

    /// I/O error on an established connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peer closed the stream mid-frame.
    #[error("connection closed by server")]
    ConnectionClosed,

    /// The inbound bytes do not form a valid frame.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The server rejected the password (request id `-1` sentinel).
    #[error("authentication rejected by server")]
    AuthenticationFailed,

    /// A command was issued before a successful handshake.
    #[error("not authenticated")]
    NotAuthenticated,

    /// `authenticate` was called twice on one connection.
    #[error("connection is already authenticated")]
    AlreadyAuthenticated,
}

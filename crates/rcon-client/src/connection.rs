//! One TCP connection to one RCON server.
//!
//! A [`Connection`] owns the stream exclusively and performs the
//! read-exact-N-bytes loop the protocol requires: 4-byte length prefix, then
//! exactly that many payload bytes, decoded as one whole frame. It is not
//! shared across tasks; at most one request is outstanding at a time, which
//! the `&mut self` receivers enforce at compile time.
//!
//! The type is generic over the stream so tests can substitute scripted
//! in-memory streams; `Connection<TcpStream>` is the production shape.

use std::io;
use std::time::Duration;

use rcon_core::{Frame, RequestIdCounter, AUTH_FAILED_SENTINEL, HEADER_LEN};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;
use tracing::{debug, trace};

use crate::error::{RconError, Result};

/// Pause after every command exchange. The ARK server side is sensitive to
/// back-to-back commands on one connection; the original client settled for
/// 3 ms and that value has held up.
const COMMAND_SETTLE: Duration = Duration::from_millis(3);

/// A single duplex connection to one server.
///
/// Lifecycle: [`Connection::connect`] → [`Connection::authenticate`] →
/// [`Connection::exec`] (repeatedly) → [`Connection::close`]. Commands before
/// a successful handshake fail with [`RconError::NotAuthenticated`]; a second
/// handshake fails with [`RconError::AlreadyAuthenticated`].
pub struct Connection<S> {
    stream: S,
    peer: String,
    authenticated: bool,
    closed: bool,
    request_ids: RequestIdCounter,
}

impl Connection<TcpStream> {
    /// Opens a TCP connection to `host:port` within `timeout`.
    ///
    /// No retries happen here; retry policy belongs to the poller.
    ///
    /// # Errors
    ///
    /// [`RconError::Timeout`] if the deadline elapses, otherwise
    /// [`RconError::Connect`] carrying the underlying I/O error.
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let peer = format!("{host}:{port}");
        let stream = time::timeout(timeout, TcpStream::connect(&peer))
            .await
            .map_err(|_| RconError::Timeout)?
            .map_err(|source| RconError::Connect {
                host: host.to_string(),
                port,
                source,
            })?;
        debug!(peer = %peer, "connected");
        Ok(Self::from_stream(stream, peer))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Wraps an already-established stream. Used by tests and by callers that
    /// manage their own connect step.
    pub fn from_stream(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            authenticated: false,
            closed: false,
            request_ids: RequestIdCounter::new(),
        }
    }

    /// Whether the handshake has completed successfully.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Performs the one-shot authentication handshake.
    ///
    /// # Errors
    ///
    /// - [`RconError::AuthenticationFailed`] when the server answers with the
    ///   request id `-1` sentinel (wrong password).
    /// - [`RconError::AlreadyAuthenticated`] on a second call.
    /// - [`RconError::Protocol`] / [`RconError::ConnectionClosed`] /
    ///   [`RconError::Io`] propagated from the exchange.
    pub async fn authenticate(&mut self, password: &str) -> Result<()> {
        if self.authenticated {
            return Err(RconError::AlreadyAuthenticated);
        }
        self.call(rcon_core::AUTH, password).await?;
        self.authenticated = true;
        debug!(peer = %self.peer, "authenticated");
        Ok(())
    }

    /// Sends one command and returns the response body.
    ///
    /// Pauses for the 3 ms settle window after the response arrives; this is
    /// a fixed post-call setback, not a retry mechanism.
    ///
    /// # Errors
    ///
    /// [`RconError::NotAuthenticated`] before a successful handshake; other
    /// variants propagate from the exchange.
    pub async fn exec(&mut self, command: &str) -> Result<String> {
        if !self.authenticated {
            return Err(RconError::NotAuthenticated);
        }
        let body = self.call(rcon_core::EXEC_COMMAND, command).await?;
        time::sleep(COMMAND_SETTLE).await;
        Ok(body)
    }

    /// One request/response exchange: write a frame, read a frame.
    ///
    /// Response request ids are not matched against the outbound id; the
    /// target protocol variant echoes them inconsistently, and with a single
    /// outstanding request the next frame is the response by construction.
    /// The `-1` sentinel is rejected on every exchange, matching the server's
    /// behaviour of signalling a dropped authentication mid-stream.
    async fn call(&mut self, kind: i32, body: &str) -> Result<String> {
        if self.closed {
            return Err(RconError::ConnectionClosed);
        }

        let request_id = self.request_ids.next();
        let out = rcon_core::encode(request_id, kind, body);
        // Single buffered write + flush so the frame hits the wire whole.
        self.stream.write_all(&out).await?;
        self.stream.flush().await?;
        trace!(peer = %self.peer, request_id, kind, "frame sent");

        let frame = self.read_frame().await?;
        trace!(
            peer = %self.peer,
            request_id = frame.request_id,
            kind = frame.kind,
            body_len = frame.body.len(),
            "frame received"
        );

        if frame.request_id == AUTH_FAILED_SENTINEL {
            return Err(RconError::AuthenticationFailed);
        }
        Ok(frame.body)
    }

    /// Reads one whole frame: header, then exactly the declared payload.
    async fn read_frame(&mut self) -> Result<Frame> {
        let mut header = [0u8; HEADER_LEN];
        self.read_exact(&mut header).await?;
        let len = rcon_core::decode_header(header)?;

        let mut payload = vec![0u8; len];
        self.read_exact(&mut payload).await?;
        Ok(rcon_core::decode_payload(&payload)?)
    }

    /// Fills `buf` completely, regardless of how the stream chunks delivery.
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.stream.read_exact(buf).await.map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                RconError::ConnectionClosed
            } else {
                RconError::Io(e)
            }
        })?;
        Ok(())
    }

    /// Shuts the stream down. Idempotent; never fails.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.stream.shutdown().await {
            // The peer may already have torn the stream down; nothing to do.
            debug!(peer = %self.peer, error = %e, "shutdown after close");
        }
        debug!(peer = %self.peer, "connection closed");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

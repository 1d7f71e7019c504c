//! Scoped connect-authenticate-use-close wrapper around a [`Connection`].
//!
//! Every external caller goes through a [`Session`]: it performs the connect
//! and handshake on entry, exposes only [`Session::send`], and guarantees the
//! socket is released on every exit path. When the handshake fails midway,
//! the partially-open connection is shut down before the error propagates.
//!
//! Dropping a session releases the socket as well (dropping the underlying
//! stream closes it); [`Session::close`] additionally performs an orderly
//! stream shutdown and is the polite way out.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

use crate::connection::Connection;
use crate::error::Result;

/// One authenticated RCON session over one exclusive connection.
pub struct Session<S = TcpStream> {
    conn: Connection<S>,
}

impl Session<TcpStream> {
    /// Connects to `host:port` and authenticates, within `connect_timeout`
    /// for the TCP step.
    ///
    /// # Errors
    ///
    /// Propagates connect, timeout, protocol, and authentication errors. On
    /// any failure after the TCP stream opened, the stream is closed before
    /// the error is returned.
    pub async fn open(
        host: &str,
        port: u16,
        password: &str,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let conn = Connection::connect(host, port, connect_timeout).await?;
        Self::handshake(conn, password).await
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Session<S> {
    /// Authenticates an already-connected [`Connection`] and wraps it.
    ///
    /// # Errors
    ///
    /// On handshake failure the connection is closed exactly once, then the
    /// error propagates.
    pub async fn handshake(mut conn: Connection<S>, password: &str) -> Result<Self> {
        if let Err(e) = conn.authenticate(password).await {
            debug!(error = %e, "handshake failed, closing connection");
            conn.close().await;
            return Err(e);
        }
        Ok(Self { conn })
    }

    /// Sends one command and returns the response body.
    pub async fn send(&mut self, command: &str) -> Result<String> {
        self.conn.exec(command).await
    }

    /// Shuts the connection down and consumes the session.
    pub async fn close(mut self) {
        self.conn.close().await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

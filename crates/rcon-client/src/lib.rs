//! # rcon-client
//!
//! Async client for the Source-style RCON protocol spoken by ARK-family game
//! servers. Built on the frame codec in `rcon-core`.
//!
//! The intended entry point is [`Session`]: it connects, authenticates, and
//! guarantees the socket is released on every exit path, including a failed
//! handshake. [`Connection`] sits underneath for callers that need the raw
//! connect/authenticate/exec steps individually.
//!
//! One request is outstanding at a time per connection; the `&mut self`
//! receivers make pipelining unrepresentable rather than merely discouraged.
//!
//! ```no_run
//! use std::time::Duration;
//! use rcon_client::Session;
//!
//! # async fn demo() -> Result<(), rcon_client::RconError> {
//! let mut session = Session::open("203.0.113.7", 27020, "hunter2", Duration::from_secs(5)).await?;
//! let players = session.send("ListPlayers").await?;
//! println!("{players}");
//! session.close().await;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod session;

pub use connection::Connection;
pub use error::RconError;
pub use session::Session;

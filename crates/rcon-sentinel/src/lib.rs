//! # rcon-sentinel
//!
//! Application layer that drives many independent RCON sessions against a
//! configured set of game servers on fixed periods: chat polling, player-list
//! polling, and cross-server broadcast.
//!
//! The pieces:
//!
//! - **`config`** – TOML configuration: the server table, the poll task
//!   table, and timing knobs (timeouts, cooldown).
//! - **`poller`** – one tokio task per (server, poll task); per-server
//!   failures are isolated and put that server into cooldown without
//!   affecting its siblings.
//! - **`ops`** – one-shot operations: a single admin command against one
//!   server, and a `ServerChat` broadcast across all of them.
//! - **`chat`** – parsing and noise-filtering of `GetChat` response lines.

pub mod chat;
pub mod config;
pub mod ops;
pub mod poller;

pub use config::{ServerTarget, SentinelConfig};
pub use poller::{Poller, PollTask, ResponseHandler, Timing};

//! One-shot operations against configured servers.
//!
//! These are the non-recurring counterparts to the poller: a single admin
//! command against one server, and a chat broadcast across all of them.
//! Broadcast failures are isolated per server, the same contract the poller
//! gives its ticks.

use std::time::Duration;

use rcon_client::{RconError, Session};
use tokio::time;
use tracing::{info, warn};

use crate::config::ServerTarget;
use crate::poller::Timing;

/// Opens a session against `target`, issues `command`, closes the session.
///
/// The shared connect-send-close unit under both the poller and the one-shot
/// operations. The session's close guarantee means no socket outlives this
/// call, whichever way it ends.
pub(crate) async fn exec_on(
    target: &ServerTarget,
    command: &str,
    connect_timeout: Duration,
) -> Result<String, RconError> {
    let mut session =
        Session::open(&target.host, target.port, &target.password, connect_timeout).await?;
    let result = session.send(command).await;
    session.close().await;
    result
}

/// Runs one command against a single server under the configured deadlines.
///
/// # Errors
///
/// Propagates any [`RconError`] from the exchange; an overall deadline miss
/// surfaces as [`RconError::Timeout`].
pub async fn run_command(
    target: &ServerTarget,
    command: &str,
    timing: &Timing,
) -> Result<String, RconError> {
    let deadline = timing.connect_timeout + timing.command_timeout;
    time::timeout(deadline, exec_on(target, command, timing.connect_timeout))
        .await
        .unwrap_or(Err(RconError::Timeout))
}

/// Sends `ServerChat <message>` to every server, each through its own
/// session, and returns the per-server outcomes in input order.
///
/// One unreachable server does not stop delivery to the rest; its entry
/// simply carries the error.
pub async fn broadcast(
    targets: &[ServerTarget],
    message: &str,
    timing: &Timing,
) -> Vec<(String, Result<String, RconError>)> {
    let command = format!("ServerChat {message}");
    let mut results = Vec::with_capacity(targets.len());

    for target in targets {
        let outcome = run_command(target, &command, timing).await;
        match &outcome {
            Ok(_) => info!(server = %target.name, "broadcast delivered"),
            Err(error) => warn!(server = %target.name, error = %error, "broadcast failed"),
        }
        results.push((target.name.clone(), outcome));
    }

    results
}

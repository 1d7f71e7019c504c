//! Multi-server poller.
//!
//! One [`Poller`] runs one recurring action (e.g. "fetch chat") against every
//! configured server, with one tokio task per server. A slow or unreachable
//! server can therefore never stall its siblings: each interaction runs in
//! its own task under its own deadline.
//!
//! Per-server state machine:
//!
//! ```text
//! IDLE → CONNECTING → ACTIVE → SUCCESS → IDLE
//!                            ↘ FAILURE → COOLDOWN → IDLE
//! ```
//!
//! On any failure the error is logged and reported, the server enters
//! cooldown, and ticks are skipped until the cooldown elapses. Other servers
//! keep their normal period. This is the single place in the stack where
//! RCON errors are caught rather than propagated.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rcon_client::RconError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::config::ServerTarget;

/// Timeout and cooldown knobs shared by the poller and the one-shot ops.
#[derive(Debug, Clone)]
pub struct Timing {
    /// Deadline for the TCP connect step.
    pub connect_timeout: Duration,
    /// Deadline for one command/response exchange.
    pub command_timeout: Duration,
    /// How long a server is skipped after a failure.
    pub cooldown: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(10),
            cooldown: Duration::from_secs(320),
        }
    }
}

/// One recurring action: a named command issued on a fixed period.
#[derive(Debug, Clone)]
pub struct PollTask {
    pub name: String,
    pub command: String,
    pub interval: Duration,
}

/// Receives poll outcomes. Implementations must be cheap and non-blocking;
/// they run on the polling tasks.
#[cfg_attr(test, mockall::automock)]
pub trait ResponseHandler: Send + Sync {
    /// Called with the response body after every successful poll.
    fn on_response(&self, server: &str, task: &str, body: &str);

    /// Called when a poll fails, before the server enters cooldown.
    fn on_error(&self, server: &str, task: &str, error: &RconError) {
        let _ = (server, task, error);
    }
}

/// Per-server poll bookkeeping, owned by that server's loop alone.
#[derive(Debug, Default)]
struct PollState {
    cooldown_until: Option<Instant>,
    last_success: Option<Instant>,
}

impl PollState {
    fn in_cooldown(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    fn record_success(&mut self, now: Instant) {
        self.last_success = Some(now);
        self.cooldown_until = None;
    }

    fn record_failure(&mut self, now: Instant, cooldown: Duration) {
        self.cooldown_until = Some(now + cooldown);
    }
}

/// Handle to one running poller. Dropping the handle detaches the tasks;
/// [`Poller::shutdown`] stops them and waits for in-flight ticks to finish.
pub struct Poller {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Poller {
    /// Spawns one polling task per server and returns the handle.
    pub fn start(
        targets: Vec<ServerTarget>,
        task: PollTask,
        timing: Timing,
        handler: Arc<dyn ResponseHandler>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            task = %task.name,
            servers = targets.len(),
            interval_ms = task.interval.as_millis() as u64,
            "poller starting"
        );

        let tasks = targets
            .into_iter()
            .map(|target| {
                tokio::spawn(poll_server(
                    target,
                    task.clone(),
                    timing.clone(),
                    Arc::clone(&handler),
                    shutdown_rx.clone(),
                ))
            })
            .collect();

        Self { shutdown_tx, tasks }
    }

    /// Signals all polling tasks to stop and waits for them to exit.
    ///
    /// A tick that is mid-flight completes (bounded by its own deadline);
    /// the session close guarantee holds either way.
    pub async fn shutdown(self) {
        // Receivers may already be gone if all tasks finished.
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            let _ = task.await;
        }
        debug!("poller stopped");
    }
}

/// The per-server loop: tick, skip while cooling down, poll once, classify.
async fn poll_server(
    target: ServerTarget,
    task: PollTask,
    timing: Timing,
    handler: Arc<dyn ResponseHandler>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut interval = time::interval(task.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut state = PollState::default();

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            _ = interval.tick() => {}
        }

        let now = Instant::now();
        if state.in_cooldown(now) {
            trace!(server = %target.name, task = %task.name, "in cooldown, tick skipped");
            continue;
        }

        let deadline = timing.connect_timeout + timing.command_timeout;
        let outcome = time::timeout(
            deadline,
            crate::ops::exec_on(&target, &task.command, timing.connect_timeout),
        )
        .await
        .unwrap_or(Err(RconError::Timeout));

        match outcome {
            Ok(body) => {
                state.record_success(now);
                trace!(server = %target.name, task = %task.name, body_len = body.len(), "poll ok");
                handler.on_response(&target.name, &task.name, &body);
            }
            Err(error) => {
                warn!(
                    server = %target.name,
                    task = %task.name,
                    error = %error,
                    cooldown_secs = timing.cooldown.as_secs(),
                    "poll failed, entering cooldown"
                );
                handler.on_error(&target.name, &task.name, &error);
                state.record_failure(now, timing.cooldown);
            }
        }
    }

    debug!(server = %target.name, task = %task.name, "poll loop stopped");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── PollState ─────────────────────────────────────────────────────────────

    #[test]
    fn test_fresh_state_is_not_in_cooldown() {
        let state = PollState::default();
        assert!(!state.in_cooldown(Instant::now()));
    }

    #[test]
    fn test_failure_enters_cooldown_for_the_configured_window() {
        let mut state = PollState::default();
        let now = Instant::now();

        state.record_failure(now, Duration::from_secs(320));

        assert!(state.in_cooldown(now));
        assert!(state.in_cooldown(now + Duration::from_secs(319)));
        assert!(!state.in_cooldown(now + Duration::from_secs(321)));
    }

    #[test]
    fn test_success_clears_cooldown() {
        let mut state = PollState::default();
        let now = Instant::now();
        state.record_failure(now, Duration::from_secs(320));

        state.record_success(now + Duration::from_secs(321));

        assert!(!state.in_cooldown(now + Duration::from_secs(322)));
        assert!(state.last_success.is_some());
    }

    #[test]
    fn test_repeated_failures_extend_cooldown() {
        let mut state = PollState::default();
        let now = Instant::now();

        state.record_failure(now, Duration::from_secs(10));
        state.record_failure(now + Duration::from_secs(11), Duration::from_secs(10));

        assert!(state.in_cooldown(now + Duration::from_secs(20)));
        assert!(!state.in_cooldown(now + Duration::from_secs(22)));
    }

    // ── Handler wiring ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_poller_with_no_servers_shuts_down_cleanly() {
        let handler = Arc::new(MockResponseHandler::new());
        let poller = Poller::start(
            Vec::new(),
            PollTask {
                name: "chat".to_string(),
                command: "GetChat".to_string(),
                interval: Duration::from_millis(50),
            },
            Timing::default(),
            handler,
        );

        poller.shutdown().await;
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_error_not_response() {
        // Arrange – a target nothing listens on; the handler must see
        // on_error and never on_response.
        let mut mock = MockResponseHandler::new();
        mock.expect_on_response().never();
        mock.expect_on_error()
            .withf(|server, task, _error| server == "ghost" && task == "chat")
            .times(1..)
            .return_const(());

        let target = ServerTarget {
            name: "ghost".to_string(),
            host: "127.0.0.1".to_string(),
            port: 1, // privileged port nobody binds in tests
            password: "pw".to_string(),
        };
        let timing = Timing {
            connect_timeout: Duration::from_millis(200),
            command_timeout: Duration::from_millis(200),
            cooldown: Duration::from_secs(60),
        };

        // Act
        let poller = Poller::start(
            vec![target],
            PollTask {
                name: "chat".to_string(),
                command: "GetChat".to_string(),
                interval: Duration::from_millis(50),
            },
            timing,
            Arc::new(mock),
        );
        time::sleep(Duration::from_millis(300)).await;
        poller.shutdown().await;
    }
}

//! RCON Sentinel entry point.
//!
//! Loads the TOML configuration, starts one poller per configured poll task,
//! and runs until Ctrl-C.
//!
//! ```text
//! main()
//!  └─ load_config()          -- server table, poll tasks, timing knobs
//!  └─ Poller::start() × N    -- one per [[poll]] entry, one task per server
//!  └─ ctrl_c().await         -- then orderly poller shutdown
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rcon_client::RconError;
use rcon_sentinel::chat::{parse_chat_line, ChatFilter};
use rcon_sentinel::config::{self, SentinelConfig};
use rcon_sentinel::poller::{Poller, ResponseHandler};

/// Logs poll outcomes. Chat responses are split into lines, noise-filtered,
/// and parsed into structured events; everything else is logged whole.
struct LogHandler {
    filter: ChatFilter,
}

impl LogHandler {
    fn new() -> Self {
        Self {
            filter: ChatFilter::default(),
        }
    }
}

impl ResponseHandler for LogHandler {
    fn on_response(&self, server: &str, task: &str, body: &str) {
        if task == "chat" {
            for line in body.lines() {
                if line.trim().is_empty() || self.filter.is_noise(line) {
                    continue;
                }
                match parse_chat_line(line) {
                    Some(chat) => info!(
                        server,
                        player = %chat.player,
                        character = %chat.character,
                        message = %chat.message,
                        "chat"
                    ),
                    None => info!(server, line, "chat (unparsed)"),
                }
            }
        } else {
            info!(server, task, response = %body.trim_end(), "poll response");
        }
    }

    fn on_error(&self, server: &str, task: &str, error: &RconError) {
        // The poller already logged and applied cooldown; surface repeated
        // authentication rejections louder since they need operator action.
        if matches!(error, RconError::AuthenticationFailed) {
            warn!(server, task, "server rejected the configured RCON password");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sentinel.toml".to_string());
    let config: SentinelConfig = config::load_config(Path::new(&config_path))?;

    // Level comes from the config file, overridable via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.monitor.log_level.clone())),
        )
        .init();

    info!(config = %config_path, servers = config.servers.len(), "rcon-sentinel starting");
    if config.servers.is_empty() {
        warn!("no [[server]] entries configured; nothing to poll");
    }

    let timing = config.monitor.timing();
    let handler: Arc<dyn ResponseHandler> = Arc::new(LogHandler::new());

    let pollers: Vec<Poller> = config
        .polls
        .iter()
        .map(|entry| {
            Poller::start(
                config.servers.clone(),
                entry.task(),
                timing.clone(),
                Arc::clone(&handler),
            )
        })
        .collect();

    info!("rcon-sentinel ready, press Ctrl-C to exit");
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    for poller in pollers {
        poller.shutdown().await;
    }

    info!("rcon-sentinel stopped");
    Ok(())
}

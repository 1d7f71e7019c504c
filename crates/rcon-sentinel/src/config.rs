//! TOML configuration for the sentinel.
//!
//! ```toml
//! [monitor]
//! log_level = "info"
//! connect_timeout_secs = 5
//! command_timeout_secs = 10
//! cooldown_secs = 320
//!
//! [[server]]
//! name = "ragnarok"
//! host = "203.0.113.7"
//! port = 27020
//! password = "hunter2"
//!
//! [[poll]]
//! name = "chat"
//! command = "GetChat"
//! interval_secs = 1
//! ```
//!
//! Fields annotated with `#[serde(default = "fn")]` fall back to the
//! documented defaults when absent, so a minimal file (or no file at all)
//! still produces a working configuration. The server table is read once at
//! startup and is immutable for the process lifetime.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::poller::{PollTask, Timing};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentinelConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// The servers to poll, unique by name.
    #[serde(default, rename = "server")]
    pub servers: Vec<ServerTarget>,
    /// The recurring poll actions to run against every server.
    #[serde(default = "default_polls", rename = "poll")]
    pub polls: Vec<PollEntry>,
}

/// Timing and logging knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Deadline for establishing the TCP connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Deadline for one command/response exchange once connected.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
    /// How long a server is skipped after a failed poll.
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: u64,
}

/// One game server: connection coordinates plus the RCON password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerTarget {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub password: String,
}

/// One recurring poll action as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollEntry {
    pub name: String,
    pub command: String,
    pub interval_secs: u64,
}

impl PollEntry {
    /// Converts the config entry into the poller's task description.
    pub fn task(&self) -> PollTask {
        PollTask {
            name: self.name.clone(),
            command: self.command.clone(),
            interval: Duration::from_secs(self.interval_secs.max(1)),
        }
    }
}

impl MonitorConfig {
    /// Bundles the timeout and cooldown knobs for the poller and ops layer.
    pub fn timing(&self) -> Timing {
        Timing {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            command_timeout: Duration::from_secs(self.command_timeout_secs),
            cooldown: Duration::from_secs(self.cooldown_secs),
        }
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_connect_timeout() -> u64 {
    5
}
fn default_command_timeout() -> u64 {
    10
}
fn default_cooldown() -> u64 {
    320
}

/// Chat every second, player list every ten: the observed tick periods.
fn default_polls() -> Vec<PollEntry> {
    vec![
        PollEntry {
            name: "chat".to_string(),
            command: "GetChat".to_string(),
            interval_secs: 1,
        },
        PollEntry {
            name: "players".to_string(),
            command: "ListPlayers".to_string(),
            interval_secs: 10,
        },
    ]
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            servers: Vec::new(),
            polls: default_polls(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            connect_timeout_secs: default_connect_timeout(),
            command_timeout_secs: default_command_timeout(),
            cooldown_secs: default_cooldown(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Loads the configuration from `path`, returning defaults if the file does
/// not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<SentinelConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: SentinelConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SentinelConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_observed_timings() {
        let cfg = SentinelConfig::default();
        assert_eq!(cfg.monitor.cooldown_secs, 320);
        assert_eq!(cfg.monitor.connect_timeout_secs, 5);
        assert_eq!(cfg.monitor.command_timeout_secs, 10);
        assert!(cfg.servers.is_empty());
    }

    #[test]
    fn test_default_polls_cover_chat_and_players() {
        let polls = default_polls();
        assert_eq!(polls.len(), 2);
        assert_eq!(polls[0].command, "GetChat");
        assert_eq!(polls[0].interval_secs, 1);
        assert_eq!(polls[1].command, "ListPlayers");
        assert_eq!(polls[1].interval_secs, 10);
    }

    #[test]
    fn test_full_config_round_trips() {
        // Arrange
        let mut cfg = SentinelConfig::default();
        cfg.servers.push(ServerTarget {
            name: "ragnarok".to_string(),
            host: "203.0.113.7".to_string(),
            port: 27020,
            password: "hunter2".to_string(),
        });
        cfg.monitor.cooldown_secs = 60;

        // Act
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: SentinelConfig = toml::from_str(&toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let toml_str = r#"
[[server]]
name = "island"
host = "10.0.0.1"
port = 27020
password = "pw"
"#;

        let cfg: SentinelConfig = toml::from_str(toml_str).expect("deserialize minimal");

        assert_eq!(cfg.servers.len(), 1);
        assert_eq!(cfg.monitor.cooldown_secs, 320);
        assert_eq!(cfg.polls.len(), 2, "default poll tasks apply when absent");
    }

    #[test]
    fn test_partial_monitor_section_overrides_defaults() {
        let toml_str = r#"
[monitor]
cooldown_secs = 30
"#;

        let cfg: SentinelConfig = toml::from_str(toml_str).expect("deserialize partial");

        assert_eq!(cfg.monitor.cooldown_secs, 30);
        assert_eq!(cfg.monitor.connect_timeout_secs, 5);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let result: Result<SentinelConfig, toml::de::Error> = toml::from_str("[[[ nope");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_missing_file_falls_back_to_defaults() {
        let path = Path::new("/nonexistent/sentinel-test/sentinel.toml");
        let cfg = load_config(path).expect("missing file must yield defaults");
        assert_eq!(cfg, SentinelConfig::default());
    }

    #[test]
    fn test_poll_entry_zero_interval_is_clamped() {
        let entry = PollEntry {
            name: "chat".to_string(),
            command: "GetChat".to_string(),
            interval_secs: 0,
        };
        assert_eq!(entry.task().interval, Duration::from_secs(1));
    }
}

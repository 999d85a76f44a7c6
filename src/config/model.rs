// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1";
pub const DEFAULT_LISTEN_PORT: u16 = 7667;
pub const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Server configuration as read from a TOML file.
///
/// ```toml
/// listen_addr = "0.0.0.0"
/// listen_port = 7667
/// task_file = "tasks.json"
/// channel_size = 64
/// allow_vars = true
/// log_requests = true
/// short_task_timeout = "30s"
/// ```
///
/// Only `task_file` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// JSON file holding the task definitions.
    ///
    /// Relative paths are resolved against the config file's directory by
    /// the loader.
    pub task_file: PathBuf,

    /// Capacity of the shared completion channels.
    #[serde(default = "default_channel_size")]
    pub channel_size: usize,

    /// Expand `${name}` in commands from the task directory's var file.
    #[serde(default)]
    pub allow_vars: bool,

    /// Log every HTTP request.
    #[serde(default)]
    pub log_requests: bool,

    /// Duration string (e.g. `"30s"`) bounding the inline wait of short
    /// tasks. Absent means no bound.
    #[serde(default)]
    pub short_task_timeout: Option<String>,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

fn default_channel_size() -> usize {
    DEFAULT_CHANNEL_SIZE
}

impl RawServerConfig {
    pub fn new(task_file: impl Into<PathBuf>) -> Self {
        Self {
            listen_addr: default_listen_addr(),
            listen_port: default_listen_port(),
            task_file: task_file.into(),
            channel_size: default_channel_size(),
            allow_vars: false,
            log_requests: false,
            short_task_timeout: None,
        }
    }
}

/// Validated server configuration.
///
/// Only obtainable through `TryFrom<RawServerConfig>` (see
/// [`crate::config::validate`]).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub listen_port: u16,
    pub task_file: PathBuf,
    pub channel_size: usize,
    pub allow_vars: bool,
    pub log_requests: bool,
    pub short_task_timeout: Option<Duration>,
}

impl ServerConfig {
    /// `host:port` string to bind.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }
}

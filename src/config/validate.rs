// src/config/validate.rs

use std::net::IpAddr;

use crate::config::duration::parse_duration;
use crate::config::model::{RawServerConfig, ServerConfig};
use crate::errors::{Result, TaskdError};

impl TryFrom<RawServerConfig> for ServerConfig {
    type Error = TaskdError;

    fn try_from(raw: RawServerConfig) -> std::result::Result<Self, Self::Error> {
        validate_listen(&raw)?;
        validate_task_file(&raw)?;
        validate_channel_size(&raw)?;

        let short_task_timeout = match raw.short_task_timeout.as_deref() {
            Some(s) => Some(parse_duration(s).map_err(|e| {
                TaskdError::Config(format!("short_task_timeout: {e}"))
            })?),
            None => None,
        };

        Ok(ServerConfig {
            listen_addr: raw.listen_addr,
            listen_port: raw.listen_port,
            task_file: raw.task_file,
            channel_size: raw.channel_size,
            allow_vars: raw.allow_vars,
            log_requests: raw.log_requests,
            short_task_timeout,
        })
    }
}

fn validate_listen(cfg: &RawServerConfig) -> Result<()> {
    if cfg.listen_port == 0 {
        return Err(TaskdError::Config(
            "listen_port must be >= 1 (got 0)".to_string(),
        ));
    }
    let addr = cfg.listen_addr.trim();
    if addr.is_empty() {
        return Err(TaskdError::Config("listen_addr must not be empty".to_string()));
    }
    if addr != "localhost" && addr.parse::<IpAddr>().is_err() {
        return Err(TaskdError::Config(format!(
            "listen_addr '{addr}' is not an IP address"
        )));
    }
    Ok(())
}

fn validate_task_file(cfg: &RawServerConfig) -> Result<()> {
    if cfg.task_file.as_os_str().is_empty() {
        return Err(TaskdError::Config("task_file must not be empty".to_string()));
    }
    Ok(())
}

fn validate_channel_size(cfg: &RawServerConfig) -> Result<()> {
    if cfg.channel_size == 0 {
        return Err(TaskdError::Config(
            "channel_size must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

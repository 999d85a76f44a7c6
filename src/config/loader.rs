// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawServerConfig, ServerConfig};
use crate::errors::Result;

/// Load a configuration file and return the raw, unvalidated model.
///
/// This only performs TOML deserialization; see [`load_and_validate`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawServerConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawServerConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load, resolve relative paths and validate a configuration file.
///
/// A relative `task_file` is taken relative to the directory holding the
/// config file, so the server can be started from anywhere.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ServerConfig> {
    let path = path.as_ref();
    let mut raw = load_from_path(path)?;
    raw.task_file = resolve_relative(path, &raw.task_file);
    ServerConfig::try_from(raw)
}

fn resolve_relative(config_path: &Path, task_file: &Path) -> PathBuf {
    if task_file.is_absolute() {
        return task_file.to_path_buf();
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(task_file),
        _ => task_file.to_path_buf(),
    }
}

/// Default config location: `Taskd.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Taskd.toml")
}

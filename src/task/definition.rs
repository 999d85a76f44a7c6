// src/task/definition.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TaskdError};

/// One `name=value` pair appended to the inherited process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    #[serde(rename = "val")]
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A named, runnable task template as stored in the task file.
///
/// ```json
/// {
///   "name": "backup",
///   "command": ["tar", "-czf", "/tmp/home.tgz", "/home"],
///   "dir": "/tmp",
///   "isLong": true,
///   "showOutput": false,
///   "env": [{ "name": "GZIP", "val": "-9" }],
///   "shell": ""
/// }
/// ```
///
/// Definitions are immutable once loaded; a reload or add-or-modify
/// replaces the whole value under its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    /// Unique key in the catalog.
    pub name: String,

    /// Program followed by its arguments. With `shell` set, the elements
    /// are joined with spaces into a single script.
    pub command: Vec<String>,

    /// Working directory; empty means "inherit the server's".
    #[serde(default)]
    pub dir: String,

    /// Long tasks return an execution ID immediately and are polled.
    #[serde(default)]
    pub is_long: bool,

    /// Whether captured stdout is returned to the client.
    #[serde(default)]
    pub show_output: bool,

    #[serde(default)]
    pub env: Vec<EnvVar>,

    /// Interpreter to run the command through with `-c`; empty disables.
    #[serde(default)]
    pub shell: String,
}

impl TaskDefinition {
    pub fn working_dir(&self) -> Option<&str> {
        (!self.dir.is_empty()).then_some(self.dir.as_str())
    }

    pub fn shell(&self) -> Option<&str> {
        (!self.shell.is_empty()).then_some(self.shell.as_str())
    }

    /// Reject definitions that can never be launched.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TaskdError::Config(
                "task definition has an empty name".to_string(),
            ));
        }
        if self.command.is_empty() || self.command[0].trim().is_empty() {
            return Err(TaskdError::Config(format!(
                "task '{}' has an empty command",
                self.name
            )));
        }
        Ok(())
    }
}

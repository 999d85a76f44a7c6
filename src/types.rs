use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Opaque key of one long-running execution.
///
/// Values are produced by [`crate::engine::id`]; clients only ever echo
/// them back when polling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(String);

impl ExecutionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ExecutionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ExecutionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a finished process reports back.
///
/// Exactly one `Completion` is produced per launched process, on either the
/// "done" or the "failed" channel of its notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: ExecutionId,
    /// Captured stdout; empty on failure.
    pub output: String,
    /// Captured stderr on success, failure description otherwise.
    pub error: String,
    pub finished_at: SystemTime,
}

/// Whether a completion arrived on the done or the failed channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Done,
    Failed,
}

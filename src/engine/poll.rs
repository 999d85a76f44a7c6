// src/engine/poll.rs

//! Read-once lookup of long-running executions.

use tracing::debug;

use crate::engine::sets::ExecutionSets;
use crate::errors::{Result, TaskdError};
use crate::types::ExecutionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    InProgress {
        id: ExecutionId,
    },
    Completed {
        id: ExecutionId,
        command: String,
        /// Empty unless the task has `showOutput` set.
        output: String,
        error: String,
    },
}

/// Look `id` up in pending, then in completed.
///
/// A completed entry is removed by the read that returns it, so a second
/// poll for the same ID fails with `ExecutionNotFound`.
pub fn poll(sets: &ExecutionSets, id: &ExecutionId) -> Result<PollResult> {
    if sets.pending.read().contains_key(id) {
        return Ok(PollResult::InProgress { id: id.clone() });
    }

    let handle = sets
        .completed
        .write()
        .remove(id)
        .ok_or_else(|| TaskdError::ExecutionNotFound(id.to_string()))?;

    debug!(id = %id, task = %handle.task, "completed execution consumed");

    let output = if handle.show_output {
        handle.output
    } else {
        String::new()
    };

    Ok(PollResult::Completed {
        id: id.clone(),
        command: handle.command,
        output,
        error: handle.error,
    })
}

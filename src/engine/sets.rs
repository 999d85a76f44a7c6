// src/engine/sets.rs

//! Pending and completed executions.
//!
//! Two maps, each behind its own lock. Writes go through exactly three
//! paths, which together keep every known ID in exactly one map:
//!
//! - [`ExecutionSets::register_pending`] (dispatcher): new ID → pending;
//! - [`ExecutionSets::complete`] (router only): pending → completed;
//! - [`crate::engine::poll`]: completed → gone, on a successful read.
//!
//! Lock order is always pending, then completed. The pending→completed
//! move holds the pending write lock for the whole transfer, so a poller
//! that finds nothing in pending is guaranteed to find a moved entry in
//! completed.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::engine::id::unique_id;
use crate::exec::RuntimeHandle;
use crate::types::{Completion, CompletionKind, ExecutionId};

/// Where an execution ID currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Pending,
    Completed,
}

#[derive(Debug, Default)]
pub struct ExecutionSets {
    pub(super) pending: RwLock<HashMap<ExecutionId, RuntimeHandle>>,
    pub(super) completed: RwLock<HashMap<ExecutionId, RuntimeHandle>>,
}

impl ExecutionSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an ID unused in either map and file `handle` under it.
    pub(crate) fn register_pending(&self, handle: RuntimeHandle) -> ExecutionId {
        let mut pending = self.pending.write();
        let completed = self.completed.read();
        let id = unique_id(|id| pending.contains_key(id) || completed.contains_key(id));
        drop(completed);

        debug!(id = %id, task = %handle.task, "registered pending execution");
        pending.insert(id.clone(), handle);
        id
    }

    /// Move the entry for `completion.id` from pending to completed,
    /// attaching the captured output.
    ///
    /// Returns `false` if no pending entry exists for the ID.
    pub(crate) fn complete(&self, completion: Completion, kind: CompletionKind) -> bool {
        let mut pending = self.pending.write();
        let Some(mut handle) = pending.remove(&completion.id) else {
            warn!(id = %completion.id, ?kind, "completion for unknown execution; dropped");
            return false;
        };

        handle.output = completion.output;
        handle.error = completion.error;
        handle.finished_at = Some(completion.finished_at);

        let mut completed = self.completed.write();
        debug!(id = %completion.id, task = %handle.task, ?kind, "execution moved to completed");
        completed.insert(completion.id, handle);
        true
    }

    /// Current state of `id`, or `None` if unknown or already consumed.
    pub fn state_of(&self, id: &ExecutionId) -> Option<ExecutionState> {
        let pending = self.pending.read();
        if pending.contains_key(id) {
            return Some(ExecutionState::Pending);
        }
        let completed = self.completed.read();
        completed
            .contains_key(id)
            .then_some(ExecutionState::Completed)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.read().len()
    }

    pub fn completed_len(&self) -> usize {
        self.completed.read().len()
    }
}

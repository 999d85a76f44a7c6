// src/engine/router.rs

//! Background loop that files finished long-running executions.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::sets::ExecutionSets;
use crate::exec::CompletionReceivers;
use crate::types::CompletionKind;

/// Single coordinating loop that files finished executions.
///
/// Every waiter of a long-running execution reports into the shared
/// done / failed channels; this loop is their only consumer and the only
/// caller of the pending→completed move.
pub struct CompletionRouter {
    sets: Arc<ExecutionSets>,
    receivers: CompletionReceivers,
    shutdown: oneshot::Receiver<()>,
}

impl CompletionRouter {
    pub fn new(
        sets: Arc<ExecutionSets>,
        receivers: CompletionReceivers,
        shutdown: oneshot::Receiver<()>,
    ) -> Self {
        Self {
            sets,
            receivers,
            shutdown,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until the shutdown signal fires or its sender is dropped.
    ///
    /// Shutdown does not drain queued events and does not touch running
    /// processes.
    pub async fn run(mut self) {
        info!("completion router started");

        loop {
            tokio::select! {
                biased;

                _ = &mut self.shutdown => {
                    info!("shutdown signal received; stopping completion router");
                    break;
                }
                Some(completion) = self.receivers.done.recv() => {
                    debug!(id = %completion.id, "done event");
                    self.sets.complete(completion, CompletionKind::Done);
                }
                Some(completion) = self.receivers.failed.recv() => {
                    debug!(id = %completion.id, error = %completion.error, "failed event");
                    self.sets.complete(completion, CompletionKind::Failed);
                }
                else => {
                    info!("completion channels closed; stopping completion router");
                    break;
                }
            }
        }

        info!("completion router exiting");
    }
}

// src/engine/dispatcher.rs

//! Request-facing execution logic.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::engine::id::random_id;
use crate::engine::sets::ExecutionSets;
use crate::errors::{Result, TaskdError};
use crate::exec::{CompletionNotifier, Launched, completion_channels, launch, wait_and_notify};
use crate::task::{TaskDefinition, TaskStore, vars};
use crate::types::{Completion, ExecutionId};

/// Knobs taken from the server config.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    /// Expand `${name}` placeholders from the task directory's var file.
    pub allow_vars: bool,
    /// Upper bound on the inline wait of a short task; `None` waits forever.
    pub short_task_timeout: Option<Duration>,
}

/// Outcome of [`Dispatcher::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Short task, already finished.
    Finished {
        command: String,
        output: String,
        error: String,
    },
    /// Long task, registered as pending; poll with `id`.
    Started {
        id: ExecutionId,
        command: String,
    },
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: Arc<TaskStore>,
    sets: Arc<ExecutionSets>,
    notifier: CompletionNotifier,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(
        store: Arc<TaskStore>,
        sets: Arc<ExecutionSets>,
        notifier: CompletionNotifier,
        options: DispatchOptions,
    ) -> Self {
        Self {
            store,
            sets,
            notifier,
            options,
        }
    }

    /// Launch the task called `name`.
    ///
    /// Long tasks return as soon as the process is started; short tasks
    /// block this call until the process exits (or the configured timeout
    /// elapses).
    pub async fn execute(&self, name: &str) -> Result<ExecutionResult> {
        let def = self
            .store
            .lookup(name)
            .ok_or_else(|| TaskdError::TaskNotFound(name.to_string()))?;

        let def = if self.options.allow_vars {
            vars::apply_vars(&def)?
        } else {
            def
        };

        let launched = launch(&def)?;

        if def.is_long {
            Ok(self.start_long(launched))
        } else {
            self.run_short(&def, launched).await
        }
    }

    fn start_long(&self, launched: Launched) -> ExecutionResult {
        let Launched { handle, process } = launched;
        let command = handle.command.clone();
        let task = handle.task.clone();

        // Register before the waiter exists so the router can never see a
        // completion for an ID it does not know.
        let id = self.sets.register_pending(handle);
        wait_and_notify(process, id.clone(), self.notifier.clone());

        info!(task = %task, id = %id, "long-running execution started");
        ExecutionResult::Started { id, command }
    }

    async fn run_short(&self, def: &TaskDefinition, launched: Launched) -> Result<ExecutionResult> {
        let Launched { handle, process } = launched;

        // Private channels: concurrent executions never share a receiver.
        let (notifier, mut receivers) = completion_channels(1);
        let id = random_id();
        wait_and_notify(process, id.clone(), notifier);

        let wait = async {
            tokio::select! {
                Some(completion) = receivers.done.recv() => Ok((completion, true)),
                Some(completion) = receivers.failed.recv() => Ok((completion, false)),
                else => Err(TaskdError::Other(anyhow::anyhow!(
                    "waiter for task '{}' exited without reporting", def.name
                ))),
            }
        };

        let (completion, succeeded) = match self.options.short_task_timeout {
            Some(after) => tokio::time::timeout(after, wait).await.map_err(|_| {
                TaskdError::ShortTaskTimeout {
                    task: def.name.clone(),
                    after,
                }
            })??,
            None => wait.await?,
        };

        debug!(task = %def.name, id = %id, succeeded, "short execution finished");
        Ok(short_result(handle.command, handle.show_output, completion))
    }
}

fn short_result(command: String, show_output: bool, completion: Completion) -> ExecutionResult {
    let output = if show_output {
        completion.output
    } else {
        String::new()
    };
    ExecutionResult::Finished {
        command,
        output,
        error: completion.error,
    }
}

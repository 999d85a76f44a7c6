// src/exec/launcher.rs

//! Non-blocking process start.

use std::time::SystemTime;

use tokio::process::{Child, ChildStderr, ChildStdout};
use tracing::info;

use crate::errors::{Result, TaskdError};
use crate::exec::invocation::Invocation;
use crate::task::TaskDefinition;

/// Bookkeeping record of one execution.
///
/// Created by [`launch`], owned by the dispatcher, then moved into the
/// pending set and finally the completed set, where the captured output is
/// attached.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    pub task: String,
    /// Program and arguments as launched.
    pub command: String,
    pub pid: Option<u32>,
    pub started_at: SystemTime,
    pub finished_at: Option<SystemTime>,
    pub show_output: bool,
    pub output: String,
    pub error: String,
}

/// The live process and its unread pipes.
///
/// Consumed by [`crate::exec::waiter::wait_and_notify`], which is the only
/// place that reads the pipes and waits for exit.
#[derive(Debug)]
pub struct RunningProcess {
    pub(crate) child: Child,
    pub(crate) stdout: ChildStdout,
    pub(crate) stderr: ChildStderr,
}

/// A freshly started execution.
#[derive(Debug)]
pub struct Launched {
    pub handle: RuntimeHandle,
    pub process: RunningProcess,
}

/// Start the process described by `def` and return immediately.
pub fn launch(def: &TaskDefinition) -> Result<Launched> {
    let invocation = Invocation::from_definition(def)?;
    launch_invocation(&def.name, def.show_output, &invocation)
}

pub fn launch_invocation(
    task: &str,
    show_output: bool,
    invocation: &Invocation,
) -> Result<Launched> {
    let command = invocation.description();

    let mut child = invocation
        .command()
        .spawn()
        .map_err(|source| TaskdError::Launch {
            task: task.to_string(),
            source,
        })?;
    let started_at = SystemTime::now();

    let stdout = child.stdout.take().ok_or_else(|| missing_pipe(task, "stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| missing_pipe(task, "stderr"))?;
    let pid = child.id();

    info!(task = %task, pid, cmd = %command, "task process started");

    Ok(Launched {
        handle: RuntimeHandle {
            task: task.to_string(),
            command,
            pid,
            started_at,
            finished_at: None,
            show_output,
            output: String::new(),
            error: String::new(),
        },
        process: RunningProcess {
            child,
            stdout,
            stderr,
        },
    })
}

fn missing_pipe(task: &str, which: &str) -> TaskdError {
    TaskdError::Launch {
        task: task.to_string(),
        source: std::io::Error::other(format!("{which} pipe was not captured")),
    }
}

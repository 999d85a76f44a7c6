// src/exec/waiter.rs

//! Background drain-and-wait for a launched process.

use std::process::ExitStatus;
use std::time::SystemTime;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::exec::launcher::RunningProcess;
use crate::types::{Completion, CompletionKind, ExecutionId};

/// The pair of channels a waiter reports into.
///
/// The server holds one shared notifier feeding the completion router;
/// synchronous executions create a private one per call so that their
/// results cannot mix with anyone else's.
#[derive(Debug, Clone)]
pub struct CompletionNotifier {
    pub done: mpsc::Sender<Completion>,
    pub failed: mpsc::Sender<Completion>,
}

/// Receiving half of a [`CompletionNotifier`].
#[derive(Debug)]
pub struct CompletionReceivers {
    pub done: mpsc::Receiver<Completion>,
    pub failed: mpsc::Receiver<Completion>,
}

/// Create a connected notifier / receivers pair.
pub fn completion_channels(capacity: usize) -> (CompletionNotifier, CompletionReceivers) {
    let (done_tx, done_rx) = mpsc::channel(capacity);
    let (failed_tx, failed_rx) = mpsc::channel(capacity);
    (
        CompletionNotifier {
            done: done_tx,
            failed: failed_tx,
        },
        CompletionReceivers {
            done: done_rx,
            failed: failed_rx,
        },
    )
}

/// Spawn a Tokio task that drains both pipes while waiting for the process
/// to exit, then sends exactly one [`Completion`]:
///
/// - clean exit → `notifier.done` with captured stdout / stderr;
/// - non-zero exit, wait error or pipe read error → `notifier.failed` with
///   a description in `error`.
///
/// Returns immediately.
pub fn wait_and_notify(
    process: RunningProcess,
    id: ExecutionId,
    notifier: CompletionNotifier,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let RunningProcess {
            mut child,
            stdout,
            stderr,
        } = process;

        // Drain concurrently with the wait: a child blocked on a full pipe
        // would otherwise never exit.
        let (out_res, err_res, status_res) =
            tokio::join!(read_pipe(stdout), read_pipe(stderr), child.wait());

        let (kind, completion) = classify(id.clone(), out_res, err_res, status_res);

        let sent = match kind {
            CompletionKind::Done => {
                info!(id = %id, "task process finished");
                notifier.done.send(completion).await
            }
            CompletionKind::Failed => {
                info!(id = %id, error = %completion.error, "task process failed");
                notifier.failed.send(completion).await
            }
        };

        if sent.is_err() {
            // Receiver gone: server shutting down or a timed-out caller.
            debug!(id = %id, "completion receiver dropped; result discarded");
        }
    })
}

async fn read_pipe<R: AsyncRead + Unpin>(mut pipe: R) -> std::io::Result<String> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn classify(
    id: ExecutionId,
    out_res: std::io::Result<String>,
    err_res: std::io::Result<String>,
    status_res: std::io::Result<ExitStatus>,
) -> (CompletionKind, Completion) {
    let finished_at = SystemTime::now();
    let failure = |error: String| {
        (
            CompletionKind::Failed,
            Completion {
                id: id.clone(),
                output: String::new(),
                error,
                finished_at,
            },
        )
    };

    let status = match status_res {
        Ok(status) => status,
        Err(e) => return failure(format!("wait failed: {e}")),
    };
    let output = match out_res {
        Ok(s) => s,
        Err(e) => return failure(format!("failed to read stdout: {e}")),
    };
    let stderr = match err_res {
        Ok(s) => s,
        Err(e) => return failure(format!("failed to read stderr: {e}")),
    };

    if !status.success() {
        warn!(id = %id, exit_code = ?status.code(), "task process exited unsuccessfully");
        let mut error = status.to_string();
        let stderr = stderr.trim_end();
        if !stderr.is_empty() {
            error.push_str(": ");
            error.push_str(stderr);
        }
        return failure(error);
    }

    (
        CompletionKind::Done,
        Completion {
            id,
            output,
            error: stderr,
            finished_at,
        },
    )
}

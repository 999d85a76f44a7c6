// src/exec/mod.rs

//! Process execution layer.
//!
//! This module starts the commands defined in tasks using
//! `tokio::process::Command` and reports their outcome over channels.
//!
//! - [`invocation`] turns a task definition into a typed launch descriptor
//!   (program, arguments, working directory, environment overlay).
//! - [`launcher`] spawns the process with piped stdout / stderr and returns
//!   the bookkeeping [`RuntimeHandle`] plus the live [`RunningProcess`].
//! - [`waiter`] drains the pipes, waits for exit and sends one completion
//!   event per process.

pub mod invocation;
pub mod launcher;
pub mod waiter;

pub use invocation::Invocation;
pub use launcher::{Launched, RunningProcess, RuntimeHandle, launch};
pub use waiter::{CompletionNotifier, CompletionReceivers, completion_channels, wait_and_notify};

// src/engine/mod.rs

//! Execution engine for taskd.
//!
//! This module ties together:
//! - the task catalog ([`crate::task::TaskStore`])
//! - the dispatcher that launches tasks inline or in the background
//! - the pending / completed execution sets
//! - the completion router loop fed by background waiters
//! - the read-once polling protocol
//!
//! [`Engine`] is the façade used by the HTTP layer and by tests.

pub mod dispatcher;
pub mod id;
pub mod poll;
pub mod router;
pub mod sets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::errors::Result;
use crate::exec::completion_channels;
use crate::task::{LoadMode, TaskDefinition, TaskStore, UpsertOutcome};
use crate::types::ExecutionId;

pub use dispatcher::{DispatchOptions, Dispatcher, ExecutionResult};
pub use poll::PollResult;
pub use router::CompletionRouter;
pub use sets::{ExecutionSets, ExecutionState};

/// Settings the engine needs from the server configuration.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub task_file: PathBuf,
    pub channel_size: usize,
    pub allow_vars: bool,
    pub short_task_timeout: Option<Duration>,
}

impl EngineOptions {
    pub fn new(task_file: impl Into<PathBuf>) -> Self {
        Self {
            task_file: task_file.into(),
            channel_size: 64,
            allow_vars: false,
            short_task_timeout: None,
        }
    }
}

impl From<&ServerConfig> for EngineOptions {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            task_file: cfg.task_file.clone(),
            channel_size: cfg.channel_size,
            allow_vars: cfg.allow_vars,
            short_task_timeout: cfg.short_task_timeout,
        }
    }
}

pub struct Engine {
    store: Arc<TaskStore>,
    sets: Arc<ExecutionSets>,
    dispatcher: Dispatcher,
    task_file: PathBuf,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    router: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("task_file", &self.task_file)
            .field("tasks", &self.store.len())
            .field("pending", &self.sets.pending_len())
            .field("completed", &self.sets.completed_len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Load the task file and start the completion router.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(options: EngineOptions) -> Result<Arc<Self>> {
        let store = TaskStore::new();
        store.load(&options.task_file, LoadMode::Replace)?;
        Ok(Self::with_store(options, store))
    }

    /// Start the engine around an already populated catalog.
    pub fn with_store(options: EngineOptions, store: TaskStore) -> Arc<Self> {
        let store = Arc::new(store);
        let sets = Arc::new(ExecutionSets::new());

        let (notifier, receivers) = completion_channels(options.channel_size.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let router = CompletionRouter::new(Arc::clone(&sets), receivers, shutdown_rx).spawn();

        let dispatcher = Dispatcher::new(
            Arc::clone(&store),
            Arc::clone(&sets),
            notifier,
            DispatchOptions {
                allow_vars: options.allow_vars,
                short_task_timeout: options.short_task_timeout,
            },
        );

        Arc::new(Self {
            store,
            sets,
            dispatcher,
            task_file: options.task_file,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            router: Mutex::new(Some(router)),
        })
    }

    pub async fn execute(&self, name: &str) -> Result<ExecutionResult> {
        self.dispatcher.execute(name).await
    }

    pub fn poll(&self, id: &ExecutionId) -> Result<PollResult> {
        poll::poll(&self.sets, id)
    }

    /// Re-read the task file, replacing the whole catalog.
    pub fn reload(&self) -> Result<usize> {
        self.store.load(&self.task_file, LoadMode::Replace)
    }

    /// Read definitions from any file with an explicit mode.
    pub fn load_from(&self, path: impl Into<PathBuf>, mode: LoadMode) -> Result<usize> {
        self.store.load(path.into(), mode)
    }

    pub fn list(&self) -> Vec<TaskDefinition> {
        self.store.list()
    }

    /// Strict add, then rewrite the task file.
    pub fn add(&self, def: TaskDefinition) -> Result<()> {
        self.store.insert(def)?;
        self.store.persist(&self.task_file)
    }

    /// Insert or overwrite by name, then rewrite the task file.
    pub fn add_or_modify(&self, def: TaskDefinition) -> Result<UpsertOutcome> {
        let outcome = self.store.upsert(def)?;
        self.store.persist(&self.task_file)?;
        Ok(outcome)
    }

    pub fn state_of(&self, id: &ExecutionId) -> Option<ExecutionState> {
        self.sets.state_of(id)
    }

    pub fn sets(&self) -> &ExecutionSets {
        &self.sets
    }

    pub fn task_file(&self) -> &std::path::Path {
        &self.task_file
    }

    /// Stop the completion router. Running processes are left alone.
    pub async fn shutdown(&self) {
        let shutdown_tx = self.shutdown_tx.lock().take();
        if let Some(tx) = shutdown_tx {
            let _ = tx.send(());
        }

        let router = self.router.lock().take();
        if let Some(router) = router {
            if let Err(e) = router.await {
                warn!(error = %e, "completion router task ended abnormally");
            }
            info!("engine stopped");
        }
    }
}

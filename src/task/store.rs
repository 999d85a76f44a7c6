// src/task/store.rs

//! In-memory catalog of task definitions.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use parking_lot::{Mutex, RwLock};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::{Result, TaskdError};
use crate::task::definition::TaskDefinition;

/// How [`TaskStore::load`] treats names already in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Drop the current catalog and keep only what the file contains.
    Replace,
    /// Add the file's tasks; any name collision fails the whole load.
    Merge,
}

/// Result of [`TaskStore::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Modified,
}

/// Thread-safe catalog keyed by task name.
///
/// Readers take a shared lock and clone what they need, so a reload never
/// waits on a long-running consumer of a definition.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: RwLock<HashMap<String, TaskDefinition>>,
    /// Held across snapshot and write so task file rewrites never overlap.
    persist_lock: Mutex<()>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-parsed definitions.
    pub fn from_definitions(defs: Vec<TaskDefinition>) -> Result<Self> {
        let store = Self::new();
        store.apply(defs, LoadMode::Merge)?;
        Ok(store)
    }

    /// Read a JSON array of definitions from `path` and apply it.
    ///
    /// Returns the number of definitions read from the file.
    pub fn load(&self, path: impl AsRef<Path>, mode: LoadMode) -> Result<usize> {
        let path = path.as_ref();
        let defs = read_task_file(path)?;
        let count = defs.len();
        self.apply(defs, mode)?;
        info!(path = %path.display(), count, ?mode, "loaded task definitions");
        Ok(count)
    }

    /// Apply a batch of definitions atomically: either every definition is
    /// visible afterwards or none is.
    pub fn apply(&self, defs: Vec<TaskDefinition>, mode: LoadMode) -> Result<()> {
        let mut incoming: HashMap<String, TaskDefinition> = HashMap::with_capacity(defs.len());
        for def in defs {
            def.validate()?;
            if incoming.contains_key(&def.name) {
                return Err(TaskdError::DuplicateTask(def.name));
            }
            incoming.insert(def.name.clone(), def);
        }

        let mut tasks = self.tasks.write();
        match mode {
            LoadMode::Replace => {
                *tasks = incoming;
            }
            LoadMode::Merge => {
                if let Some(name) = incoming.keys().find(|name| tasks.contains_key(*name)) {
                    return Err(TaskdError::DuplicateTask(name.clone()));
                }
                tasks.extend(incoming);
            }
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<TaskDefinition> {
        self.tasks.read().get(name).cloned()
    }

    /// Strict add: fails with `DuplicateTask` if the name is taken.
    pub fn insert(&self, def: TaskDefinition) -> Result<()> {
        def.validate()?;
        let mut tasks = self.tasks.write();
        if tasks.contains_key(&def.name) {
            return Err(TaskdError::DuplicateTask(def.name));
        }
        debug!(task = %def.name, "task definition added");
        tasks.insert(def.name.clone(), def);
        Ok(())
    }

    /// Insert or overwrite by name.
    pub fn upsert(&self, def: TaskDefinition) -> Result<UpsertOutcome> {
        def.validate()?;
        let name = def.name.clone();
        let previous = self.tasks.write().insert(name.clone(), def);
        let outcome = match previous {
            Some(_) => UpsertOutcome::Modified,
            None => UpsertOutcome::Inserted,
        };
        debug!(task = %name, ?outcome, "task definition upserted");
        Ok(outcome)
    }

    /// Point-in-time snapshot of the catalog, sorted by name.
    pub fn list(&self) -> Vec<TaskDefinition> {
        let mut defs: Vec<TaskDefinition> = self.tasks.read().values().cloned().collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewrite the task file wholesale from a snapshot of the catalog.
    ///
    /// The snapshot is taken after any earlier rewrite finished, so the
    /// last file on disk reflects every change made before it. The data is
    /// written to a sibling temp file and renamed over `path`; readers see
    /// either the old or the new file, never a partial one.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let _guard = self.persist_lock.lock();

        let defs = self.list();
        let data = serde_json::to_vec_pretty(&defs)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| TaskdError::Io(e.error))?;

        debug!(path = %path.display(), count = defs.len(), "task file written");
        Ok(())
    }
}

/// Parse a task file without touching any catalog.
pub fn read_task_file(path: &Path) -> Result<Vec<TaskDefinition>> {
    let contents = fs::read_to_string(path)?;
    let defs: Vec<TaskDefinition> = serde_json::from_str(&contents)?;
    Ok(defs)
}

// src/exec/invocation.rs

//! Typed description of a process launch.
//!
//! An [`Invocation`] is built from a [`TaskDefinition`] without touching
//! any process: shell resolution and argument assembly happen here, so
//! they can be tested without spawning anything. [`Invocation::command`]
//! turns it into a `tokio::process::Command`.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::errors::{Result, TaskdError};
use crate::task::TaskDefinition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Applied in order on top of the inherited environment, so a name
    /// that appears twice takes its last value.
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn from_definition(def: &TaskDefinition) -> Result<Self> {
        def.validate()?;

        let (program, args) = match def.shell() {
            Some(shell) => {
                let resolved = find_executable(shell)
                    .ok_or_else(|| TaskdError::ShellNotFound(shell.to_string()))?;
                (resolved, vec!["-c".to_string(), def.command.join(" ")])
            }
            None => (
                PathBuf::from(&def.command[0]),
                def.command[1..].to_vec(),
            ),
        };

        Ok(Self {
            program,
            args,
            cwd: def.working_dir().map(PathBuf::from),
            env: def
                .env
                .iter()
                .map(|var| (var.name.clone(), var.value.clone()))
                .collect(),
        })
    }

    /// Program and arguments joined with single spaces.
    pub fn description(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build the command with both output streams piped.
    ///
    /// Pipes are configured here, before `spawn`, so nothing the child
    /// writes can be lost. `kill_on_drop` stays off: executions are never
    /// cancelled by the server.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        for (name, value) in &self.env {
            cmd.env(name, value);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);
        cmd
    }
}

/// Resolve `name` the way a shell would: paths containing a separator are
/// checked directly, bare names are searched for in `PATH`.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(OsStr::new(name)))
        .find(|full| is_executable(full))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

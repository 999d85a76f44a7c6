// src/task/vars.rs

//! `${name}` substitution from a per-directory variable file.
//!
//! The file lives next to the task (`<dir>/task.vars`) and holds one
//! `name: value` pair per line:
//!
//! ```text
//! output: /dev/null
//! archive: "/tmp/backup.tgz"
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::{Result, TaskdError};
use crate::task::definition::TaskDefinition;

pub const VAR_FILE_NAME: &str = "task.vars";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub name: String,
    pub value: String,
}

impl Var {
    /// Build a variable, trimming the value and stripping one pair of
    /// surrounding double quotes. Names may not contain spaces.
    pub fn new(name: &str, value: &str) -> std::result::Result<Self, String> {
        let name = name.trim_end();
        if name.is_empty() {
            return Err("empty variable name".to_string());
        }
        if name.contains(' ') {
            return Err(format!("near: {name}, try remove spaces"));
        }

        let mut value = value.trim();
        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            value = &value[1..value.len() - 1];
        }

        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    fn placeholder(&self) -> String {
        format!("${{{}}}", self.name)
    }
}

/// Parse the contents of a variable file.
pub fn parse_vars(contents: &str) -> Result<Vec<Var>> {
    let mut vars = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_start();
        if line.is_empty() {
            continue;
        }

        let (name, value) = line.split_once(':').ok_or_else(|| TaskdError::Vars {
            line: line_no,
            desc: "missing ':' separator".to_string(),
        })?;

        let var = Var::new(name, value).map_err(|desc| TaskdError::Vars {
            line: line_no,
            desc,
        })?;
        vars.push(var);
    }
    Ok(vars)
}

/// Read `<dir>/task.vars`; a missing file yields no variables.
pub fn read_vars(dir: &Path) -> Result<Vec<Var>> {
    match fs::read_to_string(dir.join(VAR_FILE_NAME)) {
        Ok(contents) => parse_vars(&contents),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Replace every `${name}` in the command with its value.
pub fn expand(command: &[String], vars: &[Var]) -> Vec<String> {
    command
        .iter()
        .map(|arg| {
            vars.iter()
                .fold(arg.clone(), |acc, var| acc.replace(&var.placeholder(), &var.value))
        })
        .collect()
}

/// Return a copy of `def` with its command expanded from its directory's
/// variable file. Definitions without a directory are returned unchanged.
pub fn apply_vars(def: &TaskDefinition) -> Result<TaskDefinition> {
    let Some(dir) = def.working_dir() else {
        return Ok(def.clone());
    };

    let vars = read_vars(Path::new(dir))?;
    if vars.is_empty() {
        return Ok(def.clone());
    }

    Ok(TaskDefinition {
        command: expand(&def.command, &vars),
        ..def.clone()
    })
}

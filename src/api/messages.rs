// src/api/messages.rs

//! JSON request and response bodies of the HTTP surface.
//!
//! Shared by the axum handlers and by [`crate::client::TaskClient`], so
//! every type here derives both `Serialize` and `Deserialize`.

use serde::{Deserialize, Serialize};

use crate::engine::{ExecutionResult, PollResult};
use crate::task::TaskDefinition;
use crate::types::ExecutionId;

pub const STATUS_IN_PROGRESS: &str = "In Progress";
pub const STATUS_COMPLETED: &str = "Completed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub task_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTaskRequest {
    pub task: TaskDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    pub tasks: Vec<TaskDefinition>,
}

/// Body of a successful `/exec`.
///
/// Long tasks answer with the ID to poll; short tasks with their result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecuteResponse {
    Long {
        command: String,
        id: ExecutionId,
    },
    Short {
        command: String,
        output: String,
        error: String,
    },
}

impl From<ExecutionResult> for ExecuteResponse {
    fn from(result: ExecutionResult) -> Self {
        match result {
            ExecutionResult::Finished {
                command,
                output,
                error,
            } => ExecuteResponse::Short {
                command,
                output,
                error,
            },
            ExecutionResult::Started { id, command } => ExecuteResponse::Long { command, id },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PollQuery {
    pub id: Option<String>,
}

/// Body of a successful `/poll`.
///
/// `command`, `output` and `error` are only present once `status` is
/// [`STATUS_COMPLETED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResponse {
    pub id: ExecutionId,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PollResponse {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

impl From<PollResult> for PollResponse {
    fn from(result: PollResult) -> Self {
        match result {
            PollResult::InProgress { id } => PollResponse {
                id,
                status: STATUS_IN_PROGRESS.to_string(),
                command: None,
                output: None,
                error: None,
            },
            PollResult::Completed {
                id,
                command,
                output,
                error,
            } => PollResponse {
                id,
                status: STATUS_COMPLETED.to_string(),
                command: Some(command),
                output: Some(output),
                error: Some(error),
            },
        }
    }
}

// src/errors.rs

//! Crate-wide error type.
//!
//! Errors raised while serving a request (unknown name, launch failure,
//! bad input) travel back to the caller as `TaskdError`. Failures that
//! happen after a long-running execution was handed back to the client
//! are never represented here: they become the `error` string of the
//! execution's completion event.

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api::messages::ErrorResponse;

#[derive(Error, Debug)]
pub enum TaskdError {
    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error("execution '{0}' not found")]
    ExecutionNotFound(String),

    #[error("task already present: {0}")]
    DuplicateTask(String),

    #[error("failed to launch task '{task}': {source}")]
    Launch {
        task: String,
        #[source]
        source: std::io::Error,
    },

    #[error("shell '{0}' not found in PATH")]
    ShellNotFound(String),

    #[error("task '{task}' did not finish within {after:?}")]
    ShortTaskTimeout { task: String, after: Duration },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("variable file syntax error at line {line}: {desc}")]
    Vars { line: usize, desc: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskdError {
    /// True for errors that mean the process never started.
    pub fn is_launch_error(&self) -> bool {
        matches!(self, TaskdError::Launch { .. } | TaskdError::ShellNotFound(_))
    }

    /// HTTP status used when this error is returned by a handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TaskdError::TaskNotFound(_) | TaskdError::ExecutionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            TaskdError::DuplicateTask(_) => StatusCode::CONFLICT,
            TaskdError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TaskdError::ShortTaskTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TaskdError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, TaskdError>;

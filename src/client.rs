// src/client.rs

//! Thin HTTP client for a running taskd server.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::messages::{
    AddTaskRequest, ErrorResponse, ExecuteRequest, ExecuteResponse, ListResponse, PollResponse,
};
use crate::task::TaskDefinition;
use crate::types::ExecutionId;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct TaskClient {
    http: Client,
    base: String,
    poll_interval: Duration,
}

impl TaskClient {
    /// `base` is the server root, e.g. `http://127.0.0.1:7667`.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn list(&self) -> Result<Vec<TaskDefinition>> {
        let resp = self.http.get(self.url("/list")).send().await?;
        let body: ListResponse = json_body(resp).await?;
        Ok(body.tasks)
    }

    pub async fn refresh(&self) -> Result<()> {
        let resp = self.http.post(self.url("/refresh")).send().await?;
        expect_success(resp).await
    }

    /// Strict add; fails if the server already has a task with this name.
    pub async fn add(&self, task: TaskDefinition) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/add"))
            .json(&AddTaskRequest { task })
            .send()
            .await?;
        expect_success(resp).await
    }

    pub async fn add_or_modify(&self, task: TaskDefinition) -> Result<()> {
        let resp = self
            .http
            .put(self.url("/add"))
            .json(&AddTaskRequest { task })
            .send()
            .await?;
        expect_success(resp).await
    }

    /// Run a task to completion.
    ///
    /// Short tasks come back from `/exec` directly. Long tasks are polled
    /// every `poll_interval` until the server reports them completed; the
    /// returned value is then the final poll body.
    pub async fn execute(&self, name: &str) -> Result<ExecuteResponse> {
        let started = self.start(name).await?;

        let (command, id) = match started {
            ExecuteResponse::Long { command, id } => (command, id),
            short => return Ok(short),
        };

        debug!(task = %name, id = %id, "polling long-running execution");
        loop {
            tokio::time::sleep(self.poll_interval).await;
            let resp = self.poll(&id).await?;
            if resp.is_completed() {
                return Ok(ExecuteResponse::Short {
                    command: resp.command.unwrap_or(command),
                    output: resp.output.unwrap_or_default(),
                    error: resp.error.unwrap_or_default(),
                });
            }
        }
    }

    /// Issue `/exec` and return its body without polling.
    pub async fn start(&self, name: &str) -> Result<ExecuteResponse> {
        let resp = self
            .http
            .put(self.url("/exec"))
            .json(&ExecuteRequest {
                task_name: name.to_string(),
            })
            .send()
            .await?;
        json_body(resp).await
    }

    pub async fn poll(&self, id: &ExecutionId) -> Result<PollResponse> {
        let resp = self
            .http
            .get(self.url(&format!("/poll?id={id}")))
            .send()
            .await?;
        json_body(resp).await
    }
}

/// Read a task definition from a JSON file, for `taskd add`.
pub fn read_definition(path: &Path) -> Result<TaskDefinition> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading task definition {}", path.display()))?;
    let def = serde_json::from_str(&contents)
        .with_context(|| format!("parsing task definition {}", path.display()))?;
    Ok(def)
}

async fn json_body<T: DeserializeOwned>(resp: Response) -> Result<T> {
    if !resp.status().is_success() {
        return Err(server_error(resp).await);
    }
    Ok(resp.json::<T>().await?)
}

async fn expect_success(resp: Response) -> Result<()> {
    if !resp.status().is_success() {
        return Err(server_error(resp).await);
    }
    Ok(())
}

async fn server_error(resp: Response) -> anyhow::Error {
    let status = resp.status();
    match resp.json::<ErrorResponse>().await {
        Ok(body) => anyhow!("server returned {status}: {}", body.error),
        Err(_) => anyhow!("server returned {status}"),
    }
}

// src/api/http.rs

use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::api::messages::{
    AddTaskRequest, ExecuteRequest, ExecuteResponse, ListResponse, PollQuery, PollResponse,
};
use crate::config::ServerConfig;
use crate::engine::{Engine, EngineOptions};
use crate::errors::TaskdError;
use crate::task::UpsertOutcome;
use crate::types::ExecutionId;

type ApiResult<T> = std::result::Result<T, TaskdError>;

/// Build the HTTP router around a running engine.
pub fn router(engine: Arc<Engine>, log_requests: bool) -> Router {
    let app = Router::new()
        .route("/refresh", post(refresh))
        .route("/list", get(list))
        .route("/exec", put(execute))
        .route("/poll", get(poll))
        .route("/add", post(add).put(add_or_modify))
        .with_state(engine);

    if log_requests {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

/// Load the task file, bind the listener and serve until Ctrl-C / SIGTERM.
pub async fn serve(cfg: ServerConfig) -> Result<()> {
    let engine = Engine::start(EngineOptions::from(&cfg))?;
    let app = router(Arc::clone(&engine), cfg.log_requests);

    let addr = cfg.listen_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, task_file = %cfg.task_file.display(), "taskd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    engine.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown requested");
}

async fn refresh(State(engine): State<Arc<Engine>>) -> ApiResult<StatusCode> {
    let count = engine.reload()?;
    debug!(count, "catalog refreshed");
    Ok(StatusCode::NO_CONTENT)
}

async fn list(State(engine): State<Arc<Engine>>) -> Json<ListResponse> {
    Json(ListResponse {
        tasks: engine.list(),
    })
}

async fn execute(
    State(engine): State<Arc<Engine>>,
    body: std::result::Result<Json<ExecuteRequest>, JsonRejection>,
) -> ApiResult<Json<ExecuteResponse>> {
    let Json(req) = body.map_err(bad_body)?;
    let result = engine.execute(&req.task_name).await?;
    Ok(Json(result.into()))
}

async fn poll(
    State(engine): State<Arc<Engine>>,
    Query(query): Query<PollQuery>,
) -> ApiResult<Json<PollResponse>> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| TaskdError::InvalidRequest("missing 'id' query parameter".to_string()))?;
    let result = engine.poll(&ExecutionId::from(id))?;
    Ok(Json(result.into()))
}

async fn add(
    State(engine): State<Arc<Engine>>,
    body: std::result::Result<Json<AddTaskRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = body.map_err(bad_body)?;
    check_definition(&req)?;
    let name = req.task.name.clone();
    engine.add(req.task)?;
    info!(task = %name, "task added");
    Ok(StatusCode::NO_CONTENT)
}

async fn add_or_modify(
    State(engine): State<Arc<Engine>>,
    body: std::result::Result<Json<AddTaskRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = body.map_err(bad_body)?;
    check_definition(&req)?;
    let name = req.task.name.clone();
    match engine.add_or_modify(req.task)? {
        UpsertOutcome::Inserted => info!(task = %name, "task added"),
        UpsertOutcome::Modified => info!(task = %name, "task modified"),
    }
    Ok(StatusCode::NO_CONTENT)
}

fn check_definition(req: &AddTaskRequest) -> ApiResult<()> {
    req.task
        .validate()
        .map_err(|e| TaskdError::InvalidRequest(e.to_string()))
}

fn bad_body(rejection: JsonRejection) -> TaskdError {
    TaskdError::InvalidRequest(rejection.body_text())
}

pub mod builders;

use std::io::Write;
use std::sync::{Arc, Once};

use taskd::engine::{Engine, EngineOptions};
use taskd::task::TaskDefinition;
use tempfile::NamedTempFile;
use tracing_subscriber::{EnvFilter, fmt};

pub use builders::TaskDefinitionBuilder;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a future with a 10-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}

/// Write `defs` as a JSON task file into a fresh temp file.
pub fn write_task_file(defs: &[TaskDefinition]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp task file");
    let json = serde_json::to_string_pretty(defs).expect("serialize task definitions");
    file.write_all(json.as_bytes()).expect("write temp task file");
    file.flush().expect("flush temp task file");
    file
}

/// Start an engine over a temp task file holding `defs`.
///
/// The temp file is returned so it outlives the engine.
pub fn start_engine(defs: &[TaskDefinition]) -> (Arc<Engine>, NamedTempFile) {
    start_engine_with(defs, |_| {})
}

/// Like [`start_engine`], with a hook to adjust options first.
pub fn start_engine_with(
    defs: &[TaskDefinition],
    tweak: impl FnOnce(&mut EngineOptions),
) -> (Arc<Engine>, NamedTempFile) {
    let file = write_task_file(defs);
    let mut options = EngineOptions::new(file.path());
    tweak(&mut options);
    let engine = Engine::start(options).expect("engine should start");
    (engine, file)
}

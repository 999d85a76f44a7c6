// tests/task_store.rs

use std::error::Error;

use taskd::errors::TaskdError;
use taskd::task::{LoadMode, TaskStore, UpsertOutcome};
use taskd_test_utils::{TaskDefinitionBuilder, init_tracing, write_task_file};

type TestResult = Result<(), Box<dyn Error>>;

fn names(store: &TaskStore) -> Vec<String> {
    store.list().into_iter().map(|d| d.name).collect()
}

#[test]
fn load_replace_discards_previous_catalog() -> TestResult {
    init_tracing();
    let store = TaskStore::from_definitions(vec![
        TaskDefinitionBuilder::new("old", "true").build(),
    ])?;

    let file = write_task_file(&[
        TaskDefinitionBuilder::new("b", "echo b").build(),
        TaskDefinitionBuilder::new("a", "echo a").build(),
    ]);
    let count = store.load(file.path(), LoadMode::Replace)?;

    assert_eq!(count, 2);
    assert_eq!(names(&store), vec!["a", "b"]);
    assert!(store.lookup("old").is_none());
    Ok(())
}

#[test]
fn load_merge_adds_new_names() -> TestResult {
    let store = TaskStore::from_definitions(vec![
        TaskDefinitionBuilder::new("a", "echo a").build(),
    ])?;
    let file = write_task_file(&[TaskDefinitionBuilder::new("b", "echo b").build()]);

    store.load(file.path(), LoadMode::Merge)?;

    assert_eq!(names(&store), vec!["a", "b"]);
    Ok(())
}

#[test]
fn load_merge_with_collision_changes_nothing() -> TestResult {
    let store = TaskStore::from_definitions(vec![
        TaskDefinitionBuilder::new("a", "echo a").build(),
    ])?;
    let file = write_task_file(&[
        TaskDefinitionBuilder::new("c", "echo c").build(),
        TaskDefinitionBuilder::new("a", "echo other").build(),
    ]);

    let err = store.load(file.path(), LoadMode::Merge).unwrap_err();

    assert!(matches!(err, TaskdError::DuplicateTask(ref n) if n == "a"));
    assert_eq!(names(&store), vec!["a"]);
    assert_eq!(store.lookup("a").unwrap().command, vec!["echo", "a"]);
    Ok(())
}

#[test]
fn duplicate_names_within_one_file_are_rejected() {
    let store = TaskStore::new();
    let file = write_task_file(&[
        TaskDefinitionBuilder::new("a", "echo 1").build(),
        TaskDefinitionBuilder::new("a", "echo 2").build(),
    ]);

    let err = store.load(file.path(), LoadMode::Replace).unwrap_err();

    assert!(matches!(err, TaskdError::DuplicateTask(_)));
    assert!(store.is_empty());
}

#[test]
fn malformed_task_file_is_a_json_error() {
    let store = TaskStore::new();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, b"[{\"name\": ").unwrap();

    let err = store.load(file.path(), LoadMode::Replace).unwrap_err();

    assert!(matches!(err, TaskdError::Json(_)), "got {err:?}");
}

#[test]
fn missing_task_file_is_an_io_error() {
    let store = TaskStore::new();
    let err = store
        .load("/definitely/not/here/tasks.json", LoadMode::Replace)
        .unwrap_err();
    assert!(matches!(err, TaskdError::Io(_)));
}

#[test]
fn insert_is_strict_and_upsert_overwrites() -> TestResult {
    let store = TaskStore::new();
    store.insert(TaskDefinitionBuilder::new("a", "echo 1").build())?;

    let err = store
        .insert(TaskDefinitionBuilder::new("a", "echo 2").build())
        .unwrap_err();
    assert!(matches!(err, TaskdError::DuplicateTask(_)));
    assert_eq!(store.lookup("a").unwrap().command, vec!["echo", "1"]);

    let outcome = store.upsert(TaskDefinitionBuilder::new("a", "echo 3").build())?;
    assert_eq!(outcome, UpsertOutcome::Modified);
    assert_eq!(store.lookup("a").unwrap().command, vec!["echo", "3"]);

    let outcome = store.upsert(TaskDefinitionBuilder::new("b", "echo b").build())?;
    assert_eq!(outcome, UpsertOutcome::Inserted);
    assert_eq!(store.len(), 2);
    Ok(())
}

#[test]
fn definitions_without_a_command_are_rejected() {
    let store = TaskStore::new();
    let err = store
        .insert(TaskDefinitionBuilder::new("empty", "").build())
        .unwrap_err();
    assert!(matches!(err, TaskdError::Config(_)));
}

#[test]
fn persist_writes_a_reloadable_snapshot() -> TestResult {
    let store = TaskStore::new();
    store.insert(
        TaskDefinitionBuilder::new("z", "sleep 1")
            .long()
            .env("A", "1")
            .build(),
    )?;
    store.insert(TaskDefinitionBuilder::shell("y", "echo $HOME").build())?;

    let file = tempfile::NamedTempFile::new()?;
    store.persist(file.path())?;

    let reloaded = TaskStore::new();
    reloaded.load(file.path(), LoadMode::Replace)?;
    assert_eq!(reloaded.list(), store.list());
    Ok(())
}

#[test]
fn task_file_uses_wire_field_names() -> TestResult {
    let json = r#"[{
        "name": "backup",
        "command": ["tar", "-czf", "/tmp/x.tgz", "."],
        "dir": "/tmp",
        "isLong": true,
        "showOutput": false,
        "env": [{"name": "GZIP", "val": "-9"}],
        "shell": ""
    }]"#;
    let mut file = tempfile::NamedTempFile::new()?;
    std::io::Write::write_all(&mut file, json.as_bytes())?;

    let store = TaskStore::new();
    store.load(file.path(), LoadMode::Replace)?;

    let def = store.lookup("backup").unwrap();
    assert!(def.is_long);
    assert!(!def.show_output);
    assert_eq!(def.working_dir(), Some("/tmp"));
    assert_eq!(def.env[0].to_string(), "GZIP=-9");
    assert_eq!(def.shell(), None);
    Ok(())
}

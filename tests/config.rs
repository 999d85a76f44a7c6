// tests/config.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use taskd::config::duration::parse_duration;
use taskd::config::{RawServerConfig, ServerConfig, load_and_validate, load_from_path};
use taskd::engine::EngineOptions;
use taskd::errors::TaskdError;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn minimal_config_gets_defaults() {
    let file = config_file(r#"task_file = "/etc/taskd/tasks.json""#);
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1");
    assert_eq!(cfg.listen_port, 7667);
    assert_eq!(cfg.listen_address(), "127.0.0.1:7667");
    assert_eq!(cfg.task_file, PathBuf::from("/etc/taskd/tasks.json"));
    assert_eq!(cfg.channel_size, 64);
    assert!(!cfg.allow_vars);
    assert!(!cfg.log_requests);
    assert_eq!(cfg.short_task_timeout, None);
}

#[test]
fn full_config_is_honoured() {
    let file = config_file(
        r#"
listen_addr = "0.0.0.0"
listen_port = 9000
task_file = "/srv/tasks.json"
channel_size = 8
allow_vars = true
log_requests = true
short_task_timeout = "30s"
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.listen_address(), "0.0.0.0:9000");
    assert_eq!(cfg.channel_size, 8);
    assert!(cfg.allow_vars);
    assert!(cfg.log_requests);
    assert_eq!(cfg.short_task_timeout, Some(Duration::from_secs(30)));

    let opts = EngineOptions::from(&cfg);
    assert_eq!(opts.channel_size, 8);
    assert!(opts.allow_vars);
    assert_eq!(opts.short_task_timeout, Some(Duration::from_secs(30)));
}

#[test]
fn relative_task_file_resolves_next_to_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Taskd.toml");
    std::fs::write(&path, r#"task_file = "tasks.json""#).unwrap();

    let cfg = load_and_validate(&path).unwrap();
    assert_eq!(cfg.task_file, dir.path().join("tasks.json"));

    // The raw loader leaves paths untouched.
    let raw = load_from_path(&path).unwrap();
    assert_eq!(raw.task_file, PathBuf::from("tasks.json"));
}

#[test]
fn missing_task_file_is_a_toml_error() {
    let file = config_file(r#"listen_port = 80"#);
    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, TaskdError::Toml(_)), "got {err:?}");
}

#[test]
fn unknown_keys_are_rejected() {
    let file = config_file("task_file = \"t.json\"\nlisten_prot = 1\n");
    assert!(matches!(
        load_and_validate(file.path()).unwrap_err(),
        TaskdError::Toml(_)
    ));
}

#[test]
fn invalid_values_are_config_errors() {
    let cases = [
        ("listen_port = 0", "listen_port"),
        ("channel_size = 0", "channel_size"),
        ("listen_addr = \"not an ip\"", "listen_addr"),
        ("short_task_timeout = \"10 parsecs\"", "short_task_timeout"),
    ];
    for (line, needle) in cases {
        let mut raw: RawServerConfig = toml::from_str(&format!("task_file = \"t.json\"\n{line}"))
            .unwrap_or_else(|e| panic!("{line}: {e}"));
        raw.task_file = PathBuf::from("/t.json");
        match ServerConfig::try_from(raw) {
            Err(TaskdError::Config(msg)) => assert!(msg.contains(needle), "{line}: {msg}"),
            other => panic!("{line}: expected Config error, got {other:?}"),
        }
    }
}

#[test]
fn empty_task_file_is_rejected() {
    let raw = RawServerConfig::new("");
    assert!(matches!(
        ServerConfig::try_from(raw),
        Err(TaskdError::Config(_))
    ));
}

#[test]
fn durations_parse_with_units() {
    assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
    assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
    assert_eq!(parse_duration(" 1h ").unwrap(), Duration::from_secs(3600));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("s").is_err());
    assert!(parse_duration("5d").is_err());
}

#[test]
fn oversized_durations_are_errors_not_panics() {
    assert!(parse_duration("307445734561825861m").is_err());
    assert!(parse_duration("18446744073709551615h").is_err());
    assert!(parse_duration("99999999999999999999s").is_err());
    assert_eq!(
        parse_duration("18446744073709551615s").unwrap(),
        Duration::from_secs(u64::MAX)
    );

    let mut raw = RawServerConfig::new("/t.json");
    raw.short_task_timeout = Some("307445734561825861m".to_string());
    match ServerConfig::try_from(raw) {
        Err(TaskdError::Config(msg)) => assert!(msg.contains("short_task_timeout"), "{msg}"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

// tests/cli.rs

use std::path::PathBuf;

use clap::Parser;
use taskd::cli::{CliArgs, Command, LogLevel};

#[test]
fn serve_defaults_to_taskd_toml() {
    let args = CliArgs::try_parse_from(["taskd", "serve"]).unwrap();
    match args.command {
        Command::Serve { config } => assert_eq!(config, PathBuf::from("Taskd.toml")),
        other => panic!("unexpected {other:?}"),
    }
    assert!(args.log_level.is_none());
}

#[test]
fn client_subcommands_take_server_and_global_log_level() {
    let args = CliArgs::try_parse_from([
        "taskd",
        "exec",
        "--server",
        "http://10.0.0.1:7667",
        "backup",
        "--log-level",
        "debug",
    ])
    .unwrap();
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    match args.command {
        Command::Exec { client, name } => {
            assert_eq!(client.server, "http://10.0.0.1:7667");
            assert_eq!(name, "backup");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn add_accepts_modify_flag() {
    let args = CliArgs::try_parse_from(["taskd", "add", "task.json", "--modify"]).unwrap();
    match args.command {
        Command::Add {
            client,
            file,
            modify,
        } => {
            assert_eq!(client.server, "http://127.0.0.1:7667");
            assert_eq!(file, PathBuf::from("task.json"));
            assert!(modify);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn exec_requires_a_name() {
    assert!(CliArgs::try_parse_from(["taskd", "exec"]).is_err());
}

// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `taskd`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskd",
    version,
    about = "Run pre-registered commands on a remote host over HTTP.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKD_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the server.
    Serve {
        /// Path to the config file (TOML).
        #[arg(long, value_name = "PATH", default_value = "Taskd.toml")]
        config: PathBuf,
    },

    /// List the tasks known to the server.
    List(ClientArgs),

    /// Make the server re-read its task file.
    Refresh(ClientArgs),

    /// Execute a task and print its result (long tasks are polled).
    Exec {
        #[command(flatten)]
        client: ClientArgs,
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Poll a long-running execution once.
    Poll {
        #[command(flatten)]
        client: ClientArgs,
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Register a task from a JSON file.
    Add {
        #[command(flatten)]
        client: ClientArgs,
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Overwrite an existing task with the same name.
        #[arg(long)]
        modify: bool,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct ClientArgs {
    /// Server base URL.
    #[arg(long, value_name = "URL", default_value = "http://127.0.0.1:7667")]
    pub server: String,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

// src/lib.rs

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod task;
pub mod types;

use anyhow::Result;
use tracing::debug;

use crate::api::messages::{ExecuteResponse, PollResponse};
use crate::cli::{CliArgs, Command};
use crate::client::{TaskClient, read_definition};
use crate::config::loader::load_and_validate;
use crate::types::ExecutionId;

/// High-level entry point used by `main.rs`.
///
/// `serve` loads the config and runs the HTTP server until shutdown; every
/// other subcommand talks to a running server and prints to stdout.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Serve { config } => {
            let cfg = load_and_validate(&config)?;
            debug!(?cfg, "configuration loaded");
            api::serve(cfg).await
        }
        Command::List(client) => {
            let tasks = TaskClient::new(client.server).list().await?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
            Ok(())
        }
        Command::Refresh(client) => TaskClient::new(client.server).refresh().await,
        Command::Exec { client, name } => {
            let resp = TaskClient::new(client.server).execute(&name).await?;
            print_execute(&resp);
            Ok(())
        }
        Command::Poll { client, id } => {
            let resp = TaskClient::new(client.server)
                .poll(&ExecutionId::from(id))
                .await?;
            print_poll(&resp);
            Ok(())
        }
        Command::Add {
            client,
            file,
            modify,
        } => {
            let def = read_definition(&file)?;
            let client = TaskClient::new(client.server);
            if modify {
                client.add_or_modify(def).await
            } else {
                client.add(def).await
            }
        }
    }
}

fn print_execute(resp: &ExecuteResponse) {
    match resp {
        ExecuteResponse::Short {
            command,
            output,
            error,
        } => {
            println!("command: {command}");
            if !output.is_empty() {
                print!("{output}");
            }
            if !error.is_empty() {
                eprintln!("{error}");
            }
        }
        ExecuteResponse::Long { command, id } => {
            println!("command: {command}");
            println!("id: {id}");
        }
    }
}

fn print_poll(resp: &PollResponse) {
    println!("id: {}", resp.id);
    println!("status: {}", resp.status);
    if let Some(command) = &resp.command {
        println!("command: {command}");
    }
    if let Some(output) = resp.output.as_deref().filter(|s| !s.is_empty()) {
        print!("{output}");
    }
    if let Some(error) = resp.error.as_deref().filter(|s| !s.is_empty()) {
        eprintln!("{error}");
    }
}

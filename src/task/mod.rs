// src/task/mod.rs

//! Task definitions and the catalog that holds them.
//!
//! - [`definition`] is the serde model of one entry in the task file.
//! - [`store`] is the concurrent catalog (reload, lookup, add, list).
//! - [`vars`] expands `${name}` placeholders from a per-directory file.

pub mod definition;
pub mod store;
pub mod vars;

pub use definition::{EnvVar, TaskDefinition};
pub use store::{LoadMode, TaskStore, UpsertOutcome};

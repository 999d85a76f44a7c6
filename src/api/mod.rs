// src/api/mod.rs

//! HTTP boundary of the server.
//!
//! - [`messages`]: JSON bodies, shared with the client.
//! - [`http`]: axum routes mapping onto [`crate::engine::Engine`].

pub mod http;
pub mod messages;

pub use http::{router, serve};

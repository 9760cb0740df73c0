//! HTTP API module.
//!
//! This module provides the HTTP server, the response types and the log
//! stream for the smokestats backend.

pub mod server;
pub mod types;
pub mod logs;

pub use server::{router, start_server, AppState, ServerConfig};
pub use types::*;
pub use logs::*;

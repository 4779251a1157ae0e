//! HTTP API module.
//!
//! This module provides the upload server and its response types.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{process_upload, router, start_server, AppState};
pub use types::*;

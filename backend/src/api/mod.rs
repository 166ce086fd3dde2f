//! HTTP API module.
//!
//! The draw endpoint, its response envelope, and the live log stream.

pub mod logs;
pub mod server;
pub mod types;

pub use server::{router, start_server, AppState};
pub use types::DrawResponse;

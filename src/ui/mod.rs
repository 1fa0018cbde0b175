//! WebSocket chat coordination server implementation.

pub mod handler;
pub mod runner;
pub mod signal;
pub mod state;

pub use runner::{app, run_server, serve};
pub use state::AppState;

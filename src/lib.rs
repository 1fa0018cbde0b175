//! Room-based realtime chat coordination server.
//!
//! Clients connect over WebSocket, create or join a named room (optionally
//! password protected), and exchange messages that are fanned out to the
//! members of that room in arrival order. Membership, presence and room
//! lifecycle are coordinated entirely in memory.

pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod ui;
pub mod usecase;

// Re-export entry point
pub use ui::run_server;

//! Real-time chat server library.
//!
//! Named rooms with in-memory history, a global sticker palette and a board
//! of scheduled rooms, served over WebSocket and a small HTTP API.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::run as run_server;

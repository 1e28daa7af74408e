//! Core server infrastructure: configuration, shared state, HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, TransportMode};
pub use server::Server;
pub use state::ServerState;

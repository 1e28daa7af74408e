//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`receipts`] - receipt generation and reprint
//! - [`printer`] - printer lifecycle, status, config, test page

pub mod health;
pub mod printer;
pub mod receipts;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::error::{AppResponse, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(receipts::router())
        .merge(printer::router())
}

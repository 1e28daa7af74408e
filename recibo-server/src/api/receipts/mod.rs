//! Receipts API module
//!
//! Receipt generation and reprint endpoints.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/receipts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/generate", post(handler::generate))
        .route("/{id}/reprint", post(handler::reprint))
}

//! Printer API module
//!
//! Printer lifecycle, live status, configuration and test page.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/printer", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/status", get(handler::status))
        .route("/connect", post(handler::connect))
        .route("/disconnect", post(handler::disconnect))
        .route("/config", get(handler::get_config))
        .route("/config", put(handler::update_config))
        .route("/test-page", post(handler::test_page))
}

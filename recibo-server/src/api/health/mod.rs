//! Health check route
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /health | GET | Liveness and printer connectivity |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    printer_connected: bool,
    pending_jobs: usize,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let printer_connected = state.printer.is_connected();
    Json(HealthResponse {
        status: if printer_connected {
            "healthy"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        printer_connected,
        pending_jobs: state.printer.pending_jobs().await,
    })
}

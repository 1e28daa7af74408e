//! Printer API handlers

use axum::Json;
use axum::extract::State;
use recibo_printer::{PrinterConfig, PrinterStatus};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::error::{AppResponse, AppResult, ok, ok_with_message};

/// Live status plus queue depth
#[derive(Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub status: PrinterStatus,
    pub pending_jobs: usize,
}

/// GET /api/printer/status
///
/// Never fails; an unreachable printer reports as disconnected.
pub async fn status(State(state): State<ServerState>) -> Json<AppResponse<StatusResponse>> {
    let status = state.printer.check_status().await;
    let pending_jobs = state.printer.pending_jobs().await;
    ok(StatusResponse {
        status,
        pending_jobs,
    })
}

/// POST /api/printer/connect
pub async fn connect(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<PrinterStatus>>> {
    let status = state.printer.connect().await?;
    Ok(ok_with_message(status, "Printer connected"))
}

/// POST /api/printer/disconnect
///
/// Pending queue jobs are failed, the in-flight one (if any) is abandoned.
pub async fn disconnect(State(state): State<ServerState>) -> Json<AppResponse<()>> {
    state.printer.disconnect().await;
    ok_with_message((), "Printer disconnected")
}

/// GET /api/printer/config
pub async fn get_config(State(state): State<ServerState>) -> Json<AppResponse<PrinterConfig>> {
    ok(state.printer.config().await)
}

/// PUT /api/printer/config
///
/// Replaces the active configuration; the next encode picks it up.
pub async fn update_config(
    State(state): State<ServerState>,
    Json(config): Json<PrinterConfig>,
) -> Json<AppResponse<PrinterConfig>> {
    state.printer.update_config(config.clone()).await;
    ok_with_message(config, "Printer config updated")
}

/// POST /api/printer/test-page
pub async fn test_page(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<serde_json::Value>>> {
    let printed = state.receipts.print_test_page().await?;
    Ok(ok(serde_json::json!({ "printed": printed })))
}

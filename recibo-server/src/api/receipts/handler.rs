//! Receipts API handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::core::ServerState;
use crate::receipts::{GenerateReceiptRequest, GeneratedReceipt, PrintOutcome, ReceiptFormat};
use crate::utils::error::{AppResponse, AppResult, ok};

/// POST /api/receipts/generate request body
#[derive(Debug, Deserialize)]
pub struct GenerateReceiptBody {
    pub attendance_record_id: String,
    #[serde(default)]
    pub template_id: Option<String>,
    /// thermal | html | pdf (default thermal)
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub auto_print: bool,
}

/// POST /api/receipts/generate
///
/// Generates a receipt for an attendance record and optionally prints it.
pub async fn generate(
    State(state): State<ServerState>,
    Json(body): Json<GenerateReceiptBody>,
) -> AppResult<Json<AppResponse<GeneratedReceipt>>> {
    let format = match body.format.as_deref() {
        Some(raw) => raw.parse::<ReceiptFormat>()?,
        None => ReceiptFormat::Thermal,
    };

    let receipt = state
        .receipts
        .generate_receipt(GenerateReceiptRequest {
            attendance_record_id: body.attendance_record_id,
            template_id: body.template_id,
            format,
            auto_print: body.auto_print,
        })
        .await?;

    Ok(ok(receipt))
}

/// POST /api/receipts/{id}/reprint
///
/// Re-prints a generated receipt from its stored snapshot.
pub async fn reprint(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<PrintOutcome>>> {
    let outcome = state.receipts.reprint_receipt(&id).await?;
    Ok(ok(outcome))
}

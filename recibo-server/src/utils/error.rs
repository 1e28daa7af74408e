//! Unified error handling
//!
//! Provides the application error type and the API response envelope:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! # Error code table
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx | Request/business errors | E0003 not found |
//! | E4xxx | Printer errors | E4001 not connected |
//! | E9xxx | System errors | E9001 internal error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recibo_printer::PrintError;
use serde::Serialize;
use tracing::error;

use crate::store::StoreError;

/// Unified API response structure
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Response code (E0000 = success)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Request errors (4xx) ==========
    #[error("Validation failed: {0}")]
    /// Missing/invalid required input (400)
    Validation(String),

    #[error("Resource not found: {0}")]
    /// Record or template absent (404)
    NotFound(String),

    #[error("Render error: {0}")]
    /// Unsupported or failed receipt rendering (400)
    Render(String),

    // ========== Printer errors ==========
    #[error("Printer not connected")]
    /// Print attempted before connect (409)
    PrinterNotConnected,

    #[error("Printer out of paper")]
    /// Needs human intervention, do not auto-retry (409)
    PaperEmpty,

    #[error("Printer overheated")]
    /// Needs human intervention, do not auto-retry (409)
    PrinterOverheated,

    #[error("Printer communication failure: {0}")]
    /// Transport-level failure, retryable by the caller (502)
    Communication(String),

    // ========== System errors (5xx) ==========
    #[error("Data API error: {0}")]
    /// External data store failure (502)
    Upstream(String),

    #[error("Internal server error: {0}")]
    /// Everything else (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::Render(msg) => (StatusCode::BAD_REQUEST, "E0007", msg.clone()),

            AppError::PrinterNotConnected => (
                StatusCode::CONFLICT,
                "E4001",
                "Printer not connected".to_string(),
            ),
            AppError::PaperEmpty => (
                StatusCode::CONFLICT,
                "E4002",
                "Printer out of paper".to_string(),
            ),
            AppError::PrinterOverheated => (
                StatusCode::CONFLICT,
                "E4003",
                "Printer overheated".to_string(),
            ),
            AppError::Communication(msg) => {
                error!(target: "printer", error = %msg, "Printer communication failure");
                (StatusCode::BAD_GATEWAY, "E4004", msg.clone())
            }

            AppError::Upstream(msg) => {
                error!(target: "store", error = %msg, "Data API error");
                (StatusCode::BAD_GATEWAY, "E9002", "Data API error".to_string())
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<PrintError> for AppError {
    fn from(e: PrintError) -> Self {
        match e {
            PrintError::NotConnected => AppError::PrinterNotConnected,
            PrintError::PaperEmpty => AppError::PaperEmpty,
            PrintError::Overheated => AppError::PrinterOverheated,
            PrintError::Communication(msg) => AppError::Communication(msg),
            PrintError::Timeout(msg) => AppError::Communication(msg),
            PrintError::InvalidConfig(msg) => AppError::Validation(msg),
            PrintError::Io(e) => AppError::Communication(e.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

/// Result alias used by all handlers
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}

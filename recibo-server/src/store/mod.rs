//! External data API layer
//!
//! Attendance records, receipt templates and receipt rows live in a managed
//! relational store reached over its HTTP data API. This module declares the
//! row DTOs and the [`ReceiptStore`] trait; [`rest::RestStore`] is the
//! production implementation and tests inject fakes.
//!
//! The rows arrive as loosely-populated joins; every field that the backend
//! may omit is an `Option` here, and the assembler applies the lenient
//! fallbacks instead of failing on a partial row.

pub mod rest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use rest::RestStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Data API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Data API returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Data API response unreadable: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One attendance record joined with student and activity names
///
/// Immutable once created; referenced by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecordRow {
    pub id: String,
    pub student_id: String,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    /// presente | ausente | atrasado | saida_antecipada
    pub status: String,
    /// manual | biometric | facial | qr_code | card
    pub verification_method: String,
    #[serde(default)]
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_out_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,

    // Joined fields
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub badge_number: Option<String>,
    #[serde(default)]
    pub activity_name: Option<String>,
    #[serde(default)]
    pub subject_name: Option<String>,
}

/// A receipt template row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptTemplateRow {
    pub id: String,
    pub name: String,
    /// thermal_58mm | thermal_80mm | ...
    pub paper_size: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub footer_text: Option<String>,
}

/// Insert payload for a new receipt row
#[derive(Debug, Clone, Serialize)]
pub struct NewReceipt {
    pub attendance_record_id: String,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Full receipt snapshot (JSON)
    pub receipt_data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// thermal | html | pdf
    pub print_method: String,
    /// generated | printed | failed
    pub status: String,
}

/// A persisted receipt row as echoed back by the store
///
/// `receipt_number` is assigned by the store, never by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRow {
    pub id: String,
    #[serde(default)]
    pub receipt_number: Option<String>,
    pub attendance_record_id: String,
    pub status: String,
    /// Receipt snapshot as persisted at generation time
    #[serde(default)]
    pub receipt_data: Option<serde_json::Value>,
}

/// Status update applied to a receipt row after a print attempt
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptStatusUpdate {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_info: Option<serde_json::Value>,
}

/// Access to the external data store
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Read one attendance record by id, joined with student/activity names
    async fn get_attendance_record(&self, id: &str) -> StoreResult<Option<AttendanceRecordRow>>;

    /// Read a receipt template by id
    async fn get_template(&self, id: &str) -> StoreResult<Option<ReceiptTemplateRow>>;

    /// Read the default attendance receipt template
    async fn get_default_template(&self) -> StoreResult<Option<ReceiptTemplateRow>>;

    /// Read a persisted receipt row by id
    async fn get_receipt(&self, id: &str) -> StoreResult<Option<ReceiptRow>>;

    /// Insert a receipt row; the store assigns the receipt number
    async fn insert_receipt(&self, receipt: &NewReceipt) -> StoreResult<ReceiptRow>;

    /// Update a receipt row's print outcome
    async fn update_receipt_status(
        &self,
        id: &str,
        update: &ReceiptStatusUpdate,
    ) -> StoreResult<()>;
}

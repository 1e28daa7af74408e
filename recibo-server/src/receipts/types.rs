//! Receipt data model
//!
//! [`ReceiptData`] is an immutable snapshot of everything a renderer needs.
//! It is assembled once from the attendance record and template, persisted
//! verbatim in the receipt row, and rendered without further store lookups,
//! so a reprint reproduces the original even if the record changes later.

use chrono::{DateTime, Utc};
use recibo_printer::PaperWidth;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::AppError;

/// Output format for a rendered receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptFormat {
    /// ESC/POS byte stream for a thermal printer
    Thermal,
    /// HTML fragment, used for previews and as PDF input
    Html,
    /// Full printable document, base64-encoded
    Pdf,
}

impl ReceiptFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptFormat::Thermal => "thermal",
            ReceiptFormat::Html => "html",
            ReceiptFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ReceiptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReceiptFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "thermal" => Ok(ReceiptFormat::Thermal),
            "html" => Ok(ReceiptFormat::Html),
            "pdf" => Ok(ReceiptFormat::Pdf),
            other => Err(AppError::Render(format!(
                "Unsupported receipt format: {}",
                other
            ))),
        }
    }
}

/// Student identity block on the receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInfo {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_number: Option<String>,
}

/// The class or event the attendance belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityInfo {
    /// "Aula" when the record points at a class, "Evento" when at an event
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Activity date; falls back to the issue time when the record has no
    /// check-in timestamp
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<DateTime<Utc>>,
}

/// Attendance outcome block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceInfo {
    /// Raw status code from the record (presente, ausente, ...)
    pub status: String,
    /// Display label (PRESENTE, AUSENTE, ...)
    pub status_label: String,
    /// Display label for the verification method (Manual, Biometria, ...)
    pub verification_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Template parameters baked into the snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub paper_width: PaperWidth,
}

/// Immutable receipt snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptData {
    pub attendance_record_id: String,
    pub institution: String,
    pub title: String,
    pub student: StudentInfo,
    pub activity: ActivityInfo,
    pub attendance: AttendanceInfo,
    pub template: TemplateInfo,
    pub footer: String,
    /// Verification payload encoded into the QR code, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_payload: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("thermal".parse::<ReceiptFormat>().unwrap(), ReceiptFormat::Thermal);
        assert_eq!("HTML".parse::<ReceiptFormat>().unwrap(), ReceiptFormat::Html);
        assert!("docx".parse::<ReceiptFormat>().is_err());
    }

    #[test]
    fn test_format_round_trip() {
        for format in [ReceiptFormat::Thermal, ReceiptFormat::Html, ReceiptFormat::Pdf] {
            assert_eq!(format.as_str().parse::<ReceiptFormat>().unwrap(), format);
        }
    }
}

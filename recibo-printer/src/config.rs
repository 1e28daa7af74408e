//! Printer configuration and status types
//!
//! `PrinterConfig` is process-wide mutable state owned by the application's
//! printer service; the encoder reads it on every render. `PrinterStatus`
//! is never persisted - it is queried live before every print attempt.

use serde::{Deserialize, Serialize};

/// Thermal paper width
///
/// The two widths in common use. Column counts assume the standard
/// 12x24 dot font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperWidth {
    #[serde(rename = "58")]
    Mm58,
    #[serde(rename = "80")]
    Mm80,
}

impl PaperWidth {
    /// Printable columns for this paper width
    pub fn columns(&self) -> usize {
        match self {
            PaperWidth::Mm58 => 32,
            PaperWidth::Mm80 => 48,
        }
    }
}

/// Text encoding sent to the printer firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterEncoding {
    Utf8,
    Latin1,
}

/// Paper cut behavior at the end of a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutType {
    Full,
    Partial,
    None,
}

/// Printer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Device port (e.g. "/dev/usb/lp0", "COM3")
    pub port: String,
    /// Serial baud rate
    pub baud_rate: u32,
    pub paper_width: PaperWidth,
    pub encoding: CharacterEncoding,
    pub cut_type: CutType,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            port: "/dev/usb/lp0".to_string(),
            baud_rate: 9600,
            paper_width: PaperWidth::Mm80,
            encoding: CharacterEncoding::Utf8,
            cut_type: CutType::Partial,
        }
    }
}

/// Paper supply as reported by the printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperStatus {
    Ok,
    Low,
    Empty,
}

/// Print head temperature as reported by the printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Normal,
    High,
}

/// Live printer status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterStatus {
    pub connected: bool,
    pub paper_status: PaperStatus,
    pub temperature: Temperature,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PrinterStatus {
    /// Status for a healthy, reachable printer
    pub fn online() -> Self {
        Self {
            connected: true,
            paper_status: PaperStatus::Ok,
            temperature: Temperature::Normal,
            error: None,
        }
    }

    /// Fallback status when the transport cannot reach the printer.
    ///
    /// Status queries never fail; any transport-level error collapses
    /// into this shape with the message attached.
    pub fn unreachable(error: impl Into<String>) -> Self {
        Self {
            connected: false,
            paper_status: PaperStatus::Empty,
            temperature: Temperature::Normal,
            error: Some(error.into()),
        }
    }

    /// Whether a print attempt against this status can proceed
    pub fn printable(&self) -> bool {
        self.connected
            && self.paper_status != PaperStatus::Empty
            && self.temperature == Temperature::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_columns() {
        assert_eq!(PaperWidth::Mm58.columns(), 32);
        assert_eq!(PaperWidth::Mm80.columns(), 48);
    }

    #[test]
    fn test_unreachable_status_shape() {
        let status = PrinterStatus::unreachable("boom");
        assert!(!status.connected);
        assert_eq!(status.paper_status, PaperStatus::Empty);
        assert_eq!(status.temperature, Temperature::Normal);
        assert_eq!(status.error.as_deref(), Some("boom"));
        assert!(!status.printable());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = PrinterConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"80\""));
        assert!(json.contains("utf8"));
        let back: PrinterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.paper_width, PaperWidth::Mm80);
        assert_eq!(back.cut_type, CutType::Partial);
    }
}

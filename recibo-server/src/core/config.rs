//! Server configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | HTTP_PORT | 8080 | HTTP service port |
//! | DATA_API_URL | http://localhost:54321/rest/v1 | External data API base URL |
//! | DATA_API_KEY | (empty) | API key sent with every data API request |
//! | PRINTER_MODE | serial | Transport strategy: serial \| bridge |
//! | PRINTER_PORT | /dev/usb/lp0 | Serial device path |
//! | PRINTER_BAUD_RATE | 9600 | Serial baud rate |
//! | PAPER_WIDTH | 80 | Thermal paper width in mm (58 or 80) |
//! | PRINTER_ENCODING | utf8 | utf8 \| latin1 |
//! | CUT_TYPE | partial | full \| partial \| none |
//! | BRIDGE_URL | http://localhost:9280 | Hardware bridge base URL |
//! | INSTITUTION_NAME | MIEADI | Institution name printed on receipts |
//! | RECEIPT_FOOTER | Comprovante gerado eletronicamente | Receipt footer line |
//! | LOG_LEVEL | info | Tracing level filter |
//! | LOG_DIR | (unset) | Daily-rolling log file directory |

use recibo_printer::{CharacterEncoding, CutType, PaperWidth, PrinterConfig};

/// Printer transport strategy
///
/// Chosen explicitly by configuration rather than runtime capability
/// sniffing, so tests and deployments behave deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Direct serial/USB device
    Serial,
    /// Remote hardware-bridge HTTP API
    Bridge,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// External data API base URL
    pub data_api_url: String,
    /// External data API key
    pub data_api_key: String,
    /// Printer transport strategy
    pub transport_mode: TransportMode,
    /// Hardware bridge base URL (bridge mode only)
    pub bridge_url: String,
    /// Initial printer configuration
    pub printer: PrinterConfig,
    /// Institution name printed in receipt headers
    pub institution_name: String,
    /// Footer line printed on every receipt
    pub receipt_footer: String,
    /// Tracing level filter
    pub log_level: String,
    /// Log file directory (None = stdout only)
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        let paper_width = match std::env::var("PAPER_WIDTH").as_deref() {
            Ok("58") => PaperWidth::Mm58,
            _ => PaperWidth::Mm80,
        };
        let encoding = match std::env::var("PRINTER_ENCODING").as_deref() {
            Ok("latin1") => CharacterEncoding::Latin1,
            _ => CharacterEncoding::Utf8,
        };
        let cut_type = match std::env::var("CUT_TYPE").as_deref() {
            Ok("full") => CutType::Full,
            Ok("none") => CutType::None,
            _ => CutType::Partial,
        };
        let transport_mode = match std::env::var("PRINTER_MODE").as_deref() {
            Ok("bridge") => TransportMode::Bridge,
            _ => TransportMode::Serial,
        };

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_api_url: std::env::var("DATA_API_URL")
                .unwrap_or_else(|_| "http://localhost:54321/rest/v1".into()),
            data_api_key: std::env::var("DATA_API_KEY").unwrap_or_default(),
            transport_mode,
            bridge_url: std::env::var("BRIDGE_URL")
                .unwrap_or_else(|_| "http://localhost:9280".into()),
            printer: PrinterConfig {
                port: std::env::var("PRINTER_PORT")
                    .unwrap_or_else(|_| "/dev/usb/lp0".into()),
                baud_rate: std::env::var("PRINTER_BAUD_RATE")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(9600),
                paper_width,
                encoding,
                cut_type,
            },
            institution_name: std::env::var("INSTITUTION_NAME")
                .unwrap_or_else(|_| "MIEADI".into()),
            receipt_footer: std::env::var("RECEIPT_FOOTER")
                .unwrap_or_else(|_| "Comprovante gerado eletronicamente".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

//! # recibo-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - UTF-8 / Latin-1 text encoding for receipt printers
//! - Transport to physical hardware (serial device or hardware-bridge HTTP API)
//! - Live printer status (connected / paper / temperature)
//!
//! Business logic (WHAT to print) stays in application code:
//! - Attendance receipt rendering → recibo-server
//!
//! ## Example
//!
//! ```ignore
//! use recibo_printer::{CharacterEncoding, CutType, EscPosBuilder, PrinterTransport, SerialTransport};
//!
//! // Build ESC/POS content
//! let mut builder = EscPosBuilder::new(32, CharacterEncoding::Utf8);
//! builder.center();
//! builder.bold();
//! builder.line("COMPROVANTE DE PRESENÇA");
//! builder.bold_off();
//! builder.sep_double();
//! builder.left();
//! builder.line("Aluno: Maria Silva");
//! builder.feed(3);
//! builder.cut(CutType::Partial);
//!
//! // Send to the printer
//! let transport = SerialTransport::new("/dev/usb/lp0", 9600);
//! transport.send(&builder.build()).await?;
//! ```

mod config;
mod encoding;
mod error;
mod escpos;
mod transport;

// Re-exports
pub use config::{
    CharacterEncoding, CutType, PaperStatus, PaperWidth, PrinterConfig, PrinterStatus, Temperature,
};
pub use encoding::{center_columns, column_width, encode_text, pad_columns, truncate_columns};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use transport::{BridgeTransport, PrinterTransport, SerialTransport};

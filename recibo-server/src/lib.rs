//! Recibo Server - attendance receipt service for the MIEADI administration system
//!
//! # Architecture overview
//!
//! This service turns attendance records into printable receipts and drives a
//! thermal printer:
//!
//! - **Receipt assembly** (`receipts::assembler`): attendance record + template
//!   → normalized receipt snapshot, pure mapping
//! - **Format renderers** (`receipts::renderer`): thermal text / HTML / PDF blob
//! - **ESC/POS encoding** (`printing::encoder`): receipt → printer command stream
//! - **Print queue** (`printing`): FIFO job dispatch, one job on the wire at a time
//! - **Data API client** (`store`): attendance records, templates and receipt
//!   rows live in an external relational store reached over HTTP
//! - **HTTP API** (`api`): generate/print endpoints invoked by the admin UI
//!
//! # Module structure
//!
//! ```text
//! recibo-server/src/
//! ├── core/          # config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── receipts/      # assembly, rendering, orchestration
//! ├── printing/      # ESC/POS encoding, queue, printer service
//! ├── store/         # external data API client
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod printing;
pub mod receipts;
pub mod store;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use printing::{PrintJob, PrinterService};
pub use receipts::{ReceiptData, ReceiptFormat, ReceiptService};
pub use store::ReceiptStore;
pub use utils::{AppError, AppResult};

// Re-export logger setup
pub use utils::logger::init_logger_with_file;

pub fn print_banner() {
    println!(
        r#"
    ____            _ __
   / __ \___  _____(_) /_  ____
  / /_/ / _ \/ ___/ / __ \/ __ \
 / _, _/  __/ /__/ / /_/ / /_/ /
/_/ |_|\___/\___/_/_.___/\____/
    "#
    );
}

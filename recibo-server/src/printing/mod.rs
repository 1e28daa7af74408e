//! Thermal printing pipeline: encoding, dispatch queue, printer service

pub mod encoder;
pub mod queue;
pub mod service;

pub use encoder::encode_receipt;
pub use queue::{JobStatus, PrintJob, PrintQueue};
pub use service::PrinterService;

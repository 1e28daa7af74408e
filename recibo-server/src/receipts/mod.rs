//! Attendance receipt domain: assembly, rendering, orchestration

pub mod assembler;
pub mod renderer;
pub mod service;
pub mod types;

pub use assembler::assemble;
pub use service::{GenerateReceiptRequest, GeneratedReceipt, PrintOutcome, ReceiptService};
pub use types::{
    ActivityInfo, AttendanceInfo, ReceiptData, ReceiptFormat, StudentInfo, TemplateInfo,
};

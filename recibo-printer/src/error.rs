//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Operation attempted before a connection was established
    #[error("Printer not connected")]
    NotConnected,

    /// Printer reports no paper
    #[error("Printer out of paper")]
    PaperEmpty,

    /// Printer reports an over-temperature condition
    #[error("Printer overheated")]
    Overheated,

    /// Transport-level communication failure (wraps the underlying cause)
    #[error("Communication failure: {0}")]
    Communication(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PrintError {
    /// Whether this condition needs human intervention.
    ///
    /// Paper-out and overheating cannot be resolved by retrying;
    /// callers must not auto-retry these. Communication failures MAY
    /// be retried with backoff (this crate does not retry on its own).
    pub fn requires_intervention(&self) -> bool {
        matches!(self, PrintError::PaperEmpty | PrintError::Overheated)
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;

//! Printer service
//!
//! One instance per process, constructed at startup and injected into the
//! handlers. Owns the active [`PrinterConfig`], the connection flag and the
//! dispatch queue; the transport owns the physical or remote connection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use recibo_printer::{PrintError, PrintResult, PrinterConfig, PrinterStatus, PrinterTransport};
use tokio::sync::Mutex;
use tracing::info;

use super::queue::{PrintJob, PrintQueue};
use crate::store::ReceiptStore;

pub struct PrinterService {
    transport: Arc<dyn PrinterTransport>,
    queue: PrintQueue,
    config: Mutex<PrinterConfig>,
    connected: AtomicBool,
}

impl PrinterService {
    pub fn new(
        transport: Arc<dyn PrinterTransport>,
        store: Arc<dyn ReceiptStore>,
        config: PrinterConfig,
    ) -> Self {
        let queue = PrintQueue::new(transport.clone(), store);
        Self {
            transport,
            queue,
            config: Mutex::new(config),
            connected: AtomicBool::new(false),
        }
    }

    /// Probe the printer and mark the service connected on success
    pub async fn connect(&self) -> PrintResult<PrinterStatus> {
        let status = self.transport.status().await;
        if !status.connected {
            let reason = status
                .error
                .unwrap_or_else(|| "printer did not answer status probe".to_string());
            return Err(PrintError::Communication(reason));
        }

        self.connected.store(true, Ordering::SeqCst);
        info!("Printer connected");
        Ok(status)
    }

    /// Drop the connection flag and fail all queued jobs
    pub async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.queue.clear("printer disconnected").await;
        info!("Printer disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Live printer status; never fails, the transport reports an offline
    /// fallback instead
    pub async fn check_status(&self) -> PrinterStatus {
        self.transport.status().await
    }

    pub async fn config(&self) -> PrinterConfig {
        self.config.lock().await.clone()
    }

    /// Replace the active printer configuration
    pub async fn update_config(&self, config: PrinterConfig) {
        let mut current = self.config.lock().await;
        info!(
            paper_width = ?config.paper_width,
            encoding = ?config.encoding,
            cut_type = ?config.cut_type,
            "Printer config updated"
        );
        *current = config;
    }

    pub async fn pending_jobs(&self) -> usize {
        self.queue.pending().await
    }

    /// Queue a command stream and wait for its terminal state
    ///
    /// Rejects immediately when not connected; nothing is appended to the
    /// queue in that case.
    pub async fn print(
        &self,
        commands: Vec<u8>,
        receipt_id: Option<String>,
    ) -> PrintResult<PrintJob> {
        if !self.is_connected() {
            return Err(PrintError::NotConnected);
        }

        let outcome = self.queue.submit(PrintJob::new(receipt_id, commands)).await;
        outcome
            .await
            .map_err(|_| PrintError::Communication("print dispatcher stopped".to_string()))
    }
}

//! Server state - holds the process-wide service singletons
//!
//! Built once at startup and cloned into every handler; clones are shallow
//! (`Arc` per service). The transport strategy is fixed here from config,
//! never re-detected at runtime.

use std::sync::Arc;

use recibo_printer::{BridgeTransport, PrinterTransport, SerialTransport};
use tracing::{info, warn};

use crate::core::config::{Config, TransportMode};
use crate::printing::PrinterService;
use crate::receipts::ReceiptService;
use crate::store::{ReceiptStore, RestStore};
use crate::utils::error::AppResult;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub printer: Arc<PrinterService>,
    pub receipts: Arc<ReceiptService>,
}

impl ServerState {
    /// Wire up store, transport, printer and receipt services
    pub fn initialize(config: &Config) -> AppResult<Self> {
        let store: Arc<dyn ReceiptStore> =
            Arc::new(RestStore::new(&config.data_api_url, &config.data_api_key)?);

        let transport: Arc<dyn PrinterTransport> = match config.transport_mode {
            TransportMode::Serial => Arc::new(SerialTransport::new(
                &config.printer.port,
                config.printer.baud_rate,
            )),
            TransportMode::Bridge => Arc::new(BridgeTransport::new(&config.bridge_url)?),
        };
        info!(mode = ?config.transport_mode, "Printer transport selected");

        let printer = Arc::new(PrinterService::new(
            transport,
            store.clone(),
            config.printer.clone(),
        ));
        let receipts = Arc::new(ReceiptService::new(
            store,
            printer.clone(),
            config.institution_name.as_str(),
            config.receipt_footer.as_str(),
        ));

        Ok(Self {
            config: config.clone(),
            printer,
            receipts,
        })
    }

    /// Probe the printer once at startup
    ///
    /// An unreachable printer is logged, not fatal: receipts can still be
    /// generated and printed later through an explicit connect call.
    pub async fn connect_printer(&self) {
        match self.printer.connect().await {
            Ok(status) => {
                info!(paper = ?status.paper_status, "Printer connected at startup");
            }
            Err(e) => {
                warn!(error = %e, "Printer not reachable at startup");
            }
        }
    }
}

use std::sync::Arc;

use kassa_printer::{MemoryBus, NetworkBus, PrinterBus};

use crate::core::{Config, PrinterTransport, Result};
use crate::receipt::PrintOrchestrator;

/// State shared by all handlers
#[derive(Clone)]
pub struct ServerState {
    pub orchestrator: Arc<PrintOrchestrator>,
}

impl ServerState {
    /// Build the printer bus selected by `config`
    pub fn initialize(config: &Config) -> Result<Self> {
        let bus: Arc<dyn PrinterBus> = match config.transport {
            PrinterTransport::Usb => usb_bus(config)?,
            PrinterTransport::Network => Arc::new(
                NetworkBus::from_addr(&config.printer_addr)?
                    .with_timeout(config.printer_timeout()),
            ),
            PrinterTransport::Memory => {
                tracing::warn!("Memory printer selected, receipts are not printed");
                Arc::new(MemoryBus::new(1))
            }
        };

        tracing::info!(
            transport = %config.transport,
            width = config.paper_width,
            encoding = %config.encoding,
            "Printer bus ready"
        );
        Ok(Self::with_bus(config, bus))
    }

    /// State over an existing bus
    pub fn with_bus(config: &Config, bus: Arc<dyn PrinterBus>) -> Self {
        let orchestrator = PrintOrchestrator::new(bus, config.paper_width, config.encoding);
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

#[cfg(feature = "usb")]
fn usb_bus(config: &Config) -> Result<Arc<dyn PrinterBus>> {
    Ok(Arc::new(
        kassa_printer::UsbBus::new().with_timeout(config.printer_timeout()),
    ))
}

#[cfg(not(feature = "usb"))]
fn usb_bus(_config: &Config) -> Result<Arc<dyn PrinterBus>> {
    Err(kassa_printer::PrintError::InvalidConfig(
        "USB support not compiled in, use PRINTER_TRANSPORT=network or memory".to_string(),
    )
    .into())
}

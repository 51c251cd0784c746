//! Printer transports
//!
//! Supports:
//! - USB printer-class devices (feature `usb`)
//! - Network printers (raw TCP, port 9100)
//! - In-memory devices for tests and dry runs
//!
//! All operations block the calling thread. Async callers should run them
//! on a blocking pool.

mod memory;
mod network;
#[cfg(feature = "usb")]
mod usb;

pub use memory::{MAX_RETAINED_JOBS, MemoryBus, MemoryBusStats};
pub use network::{NetworkBus, NetworkConnection};
#[cfg(feature = "usb")]
pub use usb::{UsbBus, UsbConnection};

use std::fmt;

use crate::error::PrintResult;

/// A printer found during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceDescriptor {
    Usb {
        bus: u8,
        address: u8,
        vendor_id: u16,
        product_id: u16,
    },
    Network {
        addr: String,
    },
    Memory {
        index: usize,
    },
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usb {
                bus,
                address,
                vendor_id,
                product_id,
            } => write!(
                f,
                "usb {:03}:{:03} ({:04x}:{:04x})",
                bus, address, vendor_id, product_id
            ),
            Self::Network { addr } => write!(f, "tcp {}", addr),
            Self::Memory { index } => write!(f, "memory #{}", index),
        }
    }
}

/// The bus a printer is attached to
///
/// Wraps process-wide device state (libusb context, sockets) behind one
/// interface so tests can substitute a fake bus.
pub trait PrinterBus: Send + Sync {
    /// Enumerate attached printers. An empty list is not an error.
    fn find_printers(&self) -> PrintResult<Vec<DeviceDescriptor>>;

    /// Open the first available printer
    fn open(&self) -> PrintResult<Box<dyn PrinterConnection>>;
}

/// An open device session
pub trait PrinterConnection: Send {
    /// Send raw ESC/POS data
    fn write(&mut self, data: &[u8]) -> PrintResult<()>;

    /// Flush and release the device
    fn close(self: Box<Self>) -> PrintResult<()>;
}

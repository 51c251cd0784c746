//! # kassa-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Print directives and their encoding
//! - GB18030 text encoding and column widths
//! - USB printer-class devices (feature `usb`)
//! - Network printing (TCP port 9100)
//!
//! Business logic (WHAT to print) stays in application code:
//! - Receipt rendering → kassa-server
//!
//! ## Example
//!
//! ```ignore
//! use kassa_printer::{Directive, PrinterBus, TextEncoding, UsbBus, encode};
//!
//! let data = encode(
//!     &[Directive::Text("Hello".into()), Directive::Cut],
//!     48,
//!     TextEncoding::Gb18030,
//! );
//!
//! let bus = UsbBus::new();
//! let mut printer = bus.open()?;
//! printer.write(&data)?;
//! printer.close()?;
//! ```

mod directive;
mod encoding;
mod error;
mod escpos;
mod transport;

// Re-exports
pub use directive::{Column, Directive, Font, encode};
pub use encoding::{Align, TextEncoding, display_width, pad_width, truncate_chars, truncate_width};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use transport::{
    DeviceDescriptor, MAX_RETAINED_JOBS, MemoryBus, MemoryBusStats, NetworkBus, NetworkConnection,
    PrinterBus, PrinterConnection,
};

#[cfg(feature = "usb")]
pub use transport::{UsbBus, UsbConnection};

//! USB printer-class devices via libusb
//!
//! A device counts as a printer when any interface of its active
//! configuration has class 0x07. Opening claims that interface and writes to
//! its first bulk OUT endpoint.

use std::time::Duration;

use rusb::{Device, DeviceHandle, Direction, GlobalContext, TransferType, UsbContext};
use tracing::{debug, info, instrument, warn};

use super::{DeviceDescriptor, PrinterBus, PrinterConnection};
use crate::error::{PrintError, PrintResult};

/// USB interface class code for printers
const PRINTER_CLASS: u8 = 0x07;

/// Printer interface and endpoint on a device
#[derive(Debug, Clone, Copy)]
struct PrinterInterface {
    number: u8,
    endpoint: u8,
}

/// The host's USB bus
#[derive(Debug, Clone)]
pub struct UsbBus {
    timeout: Duration,
}

impl UsbBus {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }

    /// Set bulk write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn printers(&self) -> PrintResult<Vec<(Device<GlobalContext>, PrinterInterface)>> {
        let devices = GlobalContext::default().devices()?;
        let mut found = Vec::new();

        for device in devices.iter() {
            if let Some(iface) = printer_interface(&device) {
                found.push((device, iface));
            }
        }
        Ok(found)
    }
}

impl Default for UsbBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the printer-class interface of a device, if any
fn printer_interface(device: &Device<GlobalContext>) -> Option<PrinterInterface> {
    let config = device
        .active_config_descriptor()
        .or_else(|_| device.config_descriptor(0))
        .ok()?;

    for interface in config.interfaces() {
        for desc in interface.descriptors() {
            if desc.class_code() != PRINTER_CLASS {
                continue;
            }
            let endpoint = desc.endpoint_descriptors().find(|ep| {
                ep.direction() == Direction::Out && ep.transfer_type() == TransferType::Bulk
            });
            if let Some(ep) = endpoint {
                return Some(PrinterInterface {
                    number: desc.interface_number(),
                    endpoint: ep.address(),
                });
            }
        }
    }
    None
}

fn describe(device: &Device<GlobalContext>) -> DeviceDescriptor {
    let (vendor_id, product_id) = device
        .device_descriptor()
        .map(|d| (d.vendor_id(), d.product_id()))
        .unwrap_or_default();

    DeviceDescriptor::Usb {
        bus: device.bus_number(),
        address: device.address(),
        vendor_id,
        product_id,
    }
}

impl PrinterBus for UsbBus {
    #[instrument(skip(self))]
    fn find_printers(&self) -> PrintResult<Vec<DeviceDescriptor>> {
        let printers: Vec<DeviceDescriptor> = self
            .printers()?
            .iter()
            .map(|(device, _)| describe(device))
            .collect();

        debug!(count = printers.len(), "USB printers enumerated");
        Ok(printers)
    }

    #[instrument(skip(self))]
    fn open(&self) -> PrintResult<Box<dyn PrinterConnection>> {
        let (device, iface) = self
            .printers()?
            .into_iter()
            .next()
            .ok_or_else(|| PrintError::NotFound("Can not find printer".to_string()))?;

        let descriptor = describe(&device);
        let mut handle = device.open()?;

        // Not supported on every platform; claiming still works without it
        if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
            debug!(error = %e, "Kernel driver auto-detach unavailable");
        }
        handle.claim_interface(iface.number)?;

        info!(device = %descriptor, interface = iface.number, "USB printer opened");

        Ok(Box::new(UsbConnection {
            handle,
            iface,
            timeout: self.timeout,
        }))
    }
}

/// A claimed USB printer interface
pub struct UsbConnection {
    handle: DeviceHandle<GlobalContext>,
    iface: PrinterInterface,
    timeout: Duration,
}

impl PrinterConnection for UsbConnection {
    fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        let mut offset = 0;
        while offset < data.len() {
            let written = self
                .handle
                .write_bulk(self.iface.endpoint, &data[offset..], self.timeout)
                .map_err(|e| match e {
                    rusb::Error::Timeout => {
                        PrintError::Timeout(format!("USB write stalled after {} bytes", offset))
                    }
                    rusb::Error::NoDevice => PrintError::Offline("USB device removed".to_string()),
                    other => PrintError::Usb(other),
                })?;
            if written == 0 {
                return Err(PrintError::Offline("USB endpoint accepted no data".to_string()));
            }
            offset += written;
        }
        Ok(())
    }

    fn close(mut self: Box<Self>) -> PrintResult<()> {
        if let Err(e) = self.handle.release_interface(self.iface.number) {
            warn!(error = %e, "Failed to release USB interface");
            return Err(e.into());
        }
        // Dropping the handle closes the device
        Ok(())
    }
}

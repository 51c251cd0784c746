//! Network printer (raw TCP, port 9100)
//!
//! Most thermal printers accept raw ESC/POS on TCP port 9100.

use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use tracing::{info, instrument, warn};

use super::{DeviceDescriptor, PrinterBus, PrinterConnection};
use crate::error::{PrintError, PrintResult};

/// Probe timeout used by discovery
const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// A single network printer, seen as a bus with at most one device
#[derive(Debug, Clone)]
pub struct NetworkBus {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkBus {
    /// Create a new network printer bus
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        Self::from_addr(&format!("{}:{}", host, port))
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set connect/write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn connect(&self, timeout: Duration) -> PrintResult<TcpStream> {
        TcpStream::connect_timeout(&self.addr, timeout).map_err(|e| match e.kind() {
            std::io::ErrorKind::TimedOut => {
                PrintError::Timeout(format!("Connection timeout: {}", self.addr))
            }
            _ => PrintError::Connection(format!("{}: {}", self.addr, e)),
        })
    }
}

impl PrinterBus for NetworkBus {
    #[instrument(skip(self), fields(addr = %self.addr))]
    fn find_printers(&self) -> PrintResult<Vec<DeviceDescriptor>> {
        match self.connect(PROBE_TIMEOUT) {
            Ok(stream) => {
                let _ = stream.shutdown(Shutdown::Both);
                info!("Printer online");
                Ok(vec![DeviceDescriptor::Network {
                    addr: self.addr.to_string(),
                }])
            }
            Err(e) => {
                warn!(error = %e, "Printer offline");
                Ok(Vec::new())
            }
        }
    }

    #[instrument(skip(self), fields(addr = %self.addr))]
    fn open(&self) -> PrintResult<Box<dyn PrinterConnection>> {
        let stream = self.connect(self.timeout)?;
        stream.set_write_timeout(Some(self.timeout))?;
        info!("Connected to printer");

        Ok(Box::new(NetworkConnection {
            addr: self.addr,
            stream,
        }))
    }
}

/// An open TCP session with a network printer
#[derive(Debug)]
pub struct NetworkConnection {
    addr: SocketAddr,
    stream: TcpStream,
}

impl PrinterConnection for NetworkConnection {
    fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        self.stream.write_all(data).map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write to {} failed: {}", self.addr, e),
            ))
        })?;
        self.stream.flush()?;
        Ok(())
    }

    fn close(self: Box<Self>) -> PrintResult<()> {
        self.stream.shutdown(Shutdown::Write)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;

    #[test]
    fn test_network_bus_new() {
        let bus = NetworkBus::new("192.168.1.100", 9100).unwrap();
        assert_eq!(bus.addr().port(), 9100);
    }

    #[test]
    fn test_invalid_addr() {
        assert!(NetworkBus::from_addr("invalid").is_err());
    }

    #[test]
    fn test_find_printers_offline_is_empty() {
        // Bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let bus = NetworkBus::new("127.0.0.1", port).unwrap();

        assert!(bus.find_printers().unwrap().is_empty());
    }

    #[test]
    fn test_open_write_close() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let reader = std::thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).unwrap();
            received
        });

        let bus = NetworkBus::from_addr(&addr.to_string()).unwrap();
        let mut conn = bus.open().unwrap();
        conn.write(b"\x1B\x40hello\n").unwrap();
        conn.close().unwrap();

        assert_eq!(reader.join().unwrap(), b"\x1B\x40hello\n".to_vec());
    }
}

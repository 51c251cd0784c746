//! Print orchestrator
//!
//! Sequences one print job:
//!
//! ```text
//! Idle → DeviceOpening → Emitting → Closed
//!            │               │
//!            └──► Failed ◄───┘
//! ```
//!
//! Validation happens before the device is opened. At most one device
//! session is open at a time; concurrent jobs wait on `device_slot`. The
//! slot guard travels with the blocking session, so a cancelled request
//! keeps the slot until its session has closed.
//! There is no retry: each request gets a single attempt.

use std::sync::Arc;

use chrono::{DateTime, Local};
use kassa_printer::{
    DeviceDescriptor, PrintError, PrinterBus, PrinterConnection, TextEncoding, encode,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use super::error::{PrintJobError, PrintJobResult};
use super::formatter::ReceiptFormatter;
use super::model::ReceiptRequest;

/// Outcome of a successful print job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub message: String,
}

impl Confirmation {
    fn printed() -> Self {
        Self {
            message: "Receipt printed successfully".to_string(),
        }
    }
}

/// An open device, closed on every exit path
///
/// `close` reports the close error; dropping an unclosed session still
/// closes the device and logs any failure.
struct DeviceSession {
    conn: Option<Box<dyn PrinterConnection>>,
}

impl DeviceSession {
    fn open(bus: &dyn PrinterBus) -> PrintJobResult<Self> {
        let conn = bus.open().map_err(PrintJobError::DeviceOpen)?;
        Ok(Self { conn: Some(conn) })
    }

    fn write(&mut self, data: &[u8]) -> PrintJobResult<()> {
        match self.conn.as_mut() {
            Some(conn) => conn.write(data).map_err(PrintJobError::PrintSequence),
            None => Err(PrintJobError::PrintSequence(PrintError::Offline(
                "device session already closed".to_string(),
            ))),
        }
    }

    fn close(mut self) -> PrintJobResult<()> {
        match self.conn.take() {
            Some(conn) => conn.close().map_err(PrintJobError::PrintSequence),
            None => Ok(()),
        }
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            warn!("Closing printer after failed job");
            if let Err(e) = conn.close() {
                error!(error = %e, "Failed to close printer");
            }
        }
    }
}

/// Print orchestrator
pub struct PrintOrchestrator {
    bus: Arc<dyn PrinterBus>,
    formatter: ReceiptFormatter,
    paper_width: usize,
    encoding: TextEncoding,
    device_slot: Arc<Mutex<()>>,
}

impl PrintOrchestrator {
    pub fn new(bus: Arc<dyn PrinterBus>, paper_width: usize, encoding: TextEncoding) -> Self {
        Self {
            bus,
            formatter: ReceiptFormatter::new(),
            paper_width,
            encoding,
            device_slot: Arc::new(Mutex::new(())),
        }
    }

    /// Enumerate attached printers
    #[instrument(skip(self))]
    pub async fn find_printers(&self) -> PrintJobResult<Vec<DeviceDescriptor>> {
        let bus = Arc::clone(&self.bus);
        let devices = tokio::task::spawn_blocking(move || bus.find_printers())
            .await
            .map_err(|e| PrintJobError::Interrupted(e.to_string()))?
            .map_err(PrintJobError::DeviceDiscovery)?;

        info!(count = devices.len(), "Printer discovery finished");
        Ok(devices)
    }

    /// Validate, open the device, print, close
    #[instrument(skip(self, body))]
    pub async fn print_receipt(&self, body: &Value) -> PrintJobResult<Confirmation> {
        let receipt = ReceiptRequest::from_json(body)?;

        let slot = Arc::clone(&self.device_slot).lock_owned().await;

        let bus = Arc::clone(&self.bus);
        let formatter = self.formatter;
        let width = self.paper_width;
        let encoding = self.encoding;
        let printed_at = Local::now();

        tokio::task::spawn_blocking(move || {
            let _slot = slot;
            run_session(bus.as_ref(), &formatter, &receipt, printed_at, width, encoding)
        })
        .await
        .map_err(|e| PrintJobError::Interrupted(e.to_string()))??;

        Ok(Confirmation::printed())
    }
}

/// One device session on the calling (blocking) thread
fn run_session(
    bus: &dyn PrinterBus,
    formatter: &ReceiptFormatter,
    receipt: &ReceiptRequest,
    printed_at: DateTime<Local>,
    width: usize,
    encoding: TextEncoding,
) -> PrintJobResult<()> {
    let mut session = DeviceSession::open(bus)?;

    let directives = formatter.format(receipt, printed_at);
    let data = encode(&directives, width, encoding);

    session.write(&data)?;
    session.close()?;

    info!(
        order = %receipt.order_ref,
        items = receipt.items.len(),
        bytes = data.len(),
        "Receipt printed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kassa_printer::{MemoryBus, PrintResult};
    use serde_json::json;
    use std::time::Duration;

    /// Memory bus whose writes take a while
    struct SlowBus {
        inner: MemoryBus,
        delay: Duration,
    }

    struct SlowConnection {
        inner: Box<dyn PrinterConnection>,
        delay: Duration,
    }

    impl PrinterBus for SlowBus {
        fn find_printers(&self) -> PrintResult<Vec<DeviceDescriptor>> {
            self.inner.find_printers()
        }

        fn open(&self) -> PrintResult<Box<dyn PrinterConnection>> {
            Ok(Box::new(SlowConnection {
                inner: self.inner.open()?,
                delay: self.delay,
            }))
        }
    }

    impl PrinterConnection for SlowConnection {
        fn write(&mut self, data: &[u8]) -> PrintResult<()> {
            std::thread::sleep(self.delay);
            self.inner.write(data)
        }

        fn close(self: Box<Self>) -> PrintResult<()> {
            self.inner.close()
        }
    }

    fn orchestrator(bus: &MemoryBus) -> PrintOrchestrator {
        PrintOrchestrator::new(Arc::new(bus.clone()), 48, TextEncoding::Gb18030)
    }

    fn body() -> Value {
        json!({
            "orderId": "1001",
            "customerName": "Bilal",
            "items": [
                { "name": "Seekh Kebab", "quantity": 2, "price": 350 },
                { "name": "Lassi", "quantity": 1, "price": 120.5 }
            ],
            "total": 820.5
        })
    }

    #[tokio::test]
    async fn test_print_success_closes_device() {
        let bus = MemoryBus::new(1);
        let confirmation = orchestrator(&bus).print_receipt(&body()).await.unwrap();
        assert_eq!(confirmation.message, "Receipt printed successfully");

        let stats = bus.stats();
        assert_eq!(stats.opens, 1);
        assert_eq!(stats.closes, 1);

        let printed = String::from_utf8_lossy(&stats.jobs[0]).into_owned();
        assert!(printed.starts_with("\x1B\x40"));
        assert!(printed.contains("Order #1001\n"));
        assert!(printed.contains("Customer: Bilal\n"));
        assert!(printed.contains("Total: Rs.820.50\n"));
        assert!(printed.ends_with("\x1D\x56\x00"));
    }

    #[tokio::test]
    async fn test_validation_fails_before_device_is_touched() {
        let bus = MemoryBus::new(1);
        let err = orchestrator(&bus)
            .print_receipt(&json!({ "orderId": "1" }))
            .await
            .unwrap_err();

        assert!(matches!(err, PrintJobError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid items array");
        assert_eq!(bus.stats().opens, 0);
        assert_eq!(bus.stats().discoveries, 0);
    }

    #[tokio::test]
    async fn test_open_failure_emits_nothing() {
        let bus = MemoryBus::new(1);
        bus.fail_open("LIBUSB_ERROR_ACCESS");

        let err = orchestrator(&bus).print_receipt(&body()).await.unwrap_err();

        assert!(matches!(err, PrintJobError::DeviceOpen(_)));
        assert!(err.to_string().starts_with("Error opening printer: "));
        assert!(err.to_string().contains("LIBUSB_ERROR_ACCESS"));
        assert!(bus.stats().jobs.is_empty());
        assert_eq!(bus.stats().closes, 0);
    }

    #[tokio::test]
    async fn test_no_device_is_open_failure() {
        let bus = MemoryBus::new(0);
        let err = orchestrator(&bus).print_receipt(&body()).await.unwrap_err();
        assert_eq!(err.to_string(), "Error opening printer: Can not find printer");
    }

    #[tokio::test]
    async fn test_write_failure_still_closes_device() {
        let bus = MemoryBus::new(1);
        bus.fail_write("paper out");

        let err = orchestrator(&bus).print_receipt(&body()).await.unwrap_err();

        assert!(matches!(err, PrintJobError::PrintSequence(_)));
        assert!(err.to_string().starts_with("Error during printing: "));
        assert_eq!(bus.stats().opens, 1);
        assert_eq!(bus.stats().closes, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_jobs_are_serialized() {
        let bus = MemoryBus::new(1);
        let orch = Arc::new(orchestrator(&bus));

        let jobs: Vec<_> = (0..4)
            .map(|_| {
                let orch = Arc::clone(&orch);
                tokio::spawn(async move { orch.print_receipt(&body()).await })
            })
            .collect();
        for job in jobs {
            job.await.unwrap().unwrap();
        }

        let stats = bus.stats();
        assert_eq!(stats.opens, 4);
        assert_eq!(stats.closes, 4);
        assert_eq!(stats.max_open_sessions, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancelled_job_keeps_device_slot() {
        let bus = MemoryBus::new(1);
        let slow = SlowBus {
            inner: bus.clone(),
            delay: Duration::from_millis(300),
        };
        let orch = Arc::new(PrintOrchestrator::new(
            Arc::new(slow),
            48,
            TextEncoding::Gb18030,
        ));

        let first = {
            let orch = Arc::clone(&orch);
            tokio::spawn(async move { orch.print_receipt(&body()).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        first.abort();
        assert!(first.await.unwrap_err().is_cancelled());

        orch.print_receipt(&body()).await.unwrap();

        let stats = bus.stats();
        assert_eq!(stats.opens, 2);
        assert_eq!(stats.closes, 2);
        assert_eq!(stats.max_open_sessions, 1);
    }

    #[tokio::test]
    async fn test_overflowing_line_total_never_opens_device() {
        let bus = MemoryBus::new(1);
        let body = json!({
            "orderId": "9",
            "items": [{ "name": "Bulk", "quantity": 4_000_000_000u64, "price": 1e20 }]
        });
        let err = orchestrator(&bus).print_receipt(&body).await.unwrap_err();

        assert!(matches!(err, PrintJobError::Validation(_)));
        assert_eq!(err.to_string(), "items[0]: line total out of range");
        assert_eq!(bus.stats().opens, 0);
    }

    #[tokio::test]
    async fn test_discovery() {
        let bus = MemoryBus::new(2);
        assert_eq!(orchestrator(&bus).find_printers().await.unwrap().len(), 2);

        bus.fail_discovery("bus reset");
        let err = orchestrator(&bus).find_printers().await.unwrap_err();
        assert!(matches!(err, PrintJobError::DeviceDiscovery(_)));
    }
}

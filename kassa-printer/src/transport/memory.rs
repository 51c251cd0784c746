//! In-process printer bus
//!
//! Records every open, write and close instead of talking to hardware.
//! Used by tests and by dry-run deployments. Only the most recent
//! [`MAX_RETAINED_JOBS`] sessions keep their bytes.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use super::{DeviceDescriptor, PrinterBus, PrinterConnection};
use crate::error::{PrintError, PrintResult};

/// Closed sessions whose bytes are kept
pub const MAX_RETAINED_JOBS: usize = 16;

#[derive(Debug, Default)]
struct MemoryState {
    devices: usize,
    discovery_error: Option<String>,
    open_error: Option<String>,
    write_error: Option<String>,
    discoveries: usize,
    opens: usize,
    closes: usize,
    open_sessions: usize,
    max_open_sessions: usize,
    jobs: VecDeque<Vec<u8>>,
}

/// Snapshot of what happened on a [`MemoryBus`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBusStats {
    pub discoveries: usize,
    pub opens: usize,
    pub closes: usize,
    /// Highest number of sessions open at the same time
    pub max_open_sessions: usize,
    /// Bytes of the most recent closed sessions, oldest first
    pub jobs: Vec<Vec<u8>>,
}

/// Fake bus with a configurable number of devices and failure modes
///
/// Clones share state, so a test can keep one handle and give another to the
/// code under test.
#[derive(Debug, Clone, Default)]
pub struct MemoryBus {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBus {
    /// Bus with `devices` printers attached
    pub fn new(devices: usize) -> Self {
        let bus = Self::default();
        bus.state.lock().devices = devices;
        bus
    }

    pub fn set_devices(&self, devices: usize) {
        self.state.lock().devices = devices;
    }

    /// Make discovery fail with `message`
    pub fn fail_discovery(&self, message: impl Into<String>) {
        self.state.lock().discovery_error = Some(message.into());
    }

    /// Make open fail with `message`
    pub fn fail_open(&self, message: impl Into<String>) {
        self.state.lock().open_error = Some(message.into());
    }

    /// Make writes fail with `message`
    pub fn fail_write(&self, message: impl Into<String>) {
        self.state.lock().write_error = Some(message.into());
    }

    pub fn stats(&self) -> MemoryBusStats {
        let state = self.state.lock();
        MemoryBusStats {
            discoveries: state.discoveries,
            opens: state.opens,
            closes: state.closes,
            max_open_sessions: state.max_open_sessions,
            jobs: state.jobs.iter().cloned().collect(),
        }
    }
}

impl PrinterBus for MemoryBus {
    fn find_printers(&self) -> PrintResult<Vec<DeviceDescriptor>> {
        let mut state = self.state.lock();
        state.discoveries += 1;

        if let Some(message) = &state.discovery_error {
            return Err(PrintError::Connection(message.clone()));
        }
        Ok((0..state.devices)
            .map(|index| DeviceDescriptor::Memory { index })
            .collect())
    }

    fn open(&self) -> PrintResult<Box<dyn PrinterConnection>> {
        let mut state = self.state.lock();
        state.opens += 1;

        if let Some(message) = &state.open_error {
            return Err(PrintError::Connection(message.clone()));
        }
        if state.devices == 0 {
            return Err(PrintError::NotFound("Can not find printer".to_string()));
        }

        state.open_sessions += 1;
        state.max_open_sessions = state.max_open_sessions.max(state.open_sessions);

        Ok(Box::new(MemoryConnection {
            state: Arc::clone(&self.state),
            written: Vec::new(),
        }))
    }
}

struct MemoryConnection {
    state: Arc<Mutex<MemoryState>>,
    written: Vec<u8>,
}

impl PrinterConnection for MemoryConnection {
    fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        if let Some(message) = &self.state.lock().write_error {
            return Err(PrintError::Offline(message.clone()));
        }
        self.written.extend_from_slice(data);
        Ok(())
    }

    fn close(self: Box<Self>) -> PrintResult<()> {
        let MemoryConnection { state, written } = *self;
        let mut state = state.lock();
        state.closes += 1;
        state.open_sessions -= 1;
        info!(bytes = written.len(), "memory printer closed");

        if state.jobs.len() == MAX_RETAINED_JOBS {
            state.jobs.pop_front();
        }
        state.jobs.push_back(written);
        Ok(())
    }
}

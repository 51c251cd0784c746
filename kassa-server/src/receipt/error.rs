//! Print job errors

use kassa_printer::PrintError;
use thiserror::Error;

/// Everything that can go wrong between a request body and a printed receipt
#[derive(Debug, Error)]
pub enum PrintJobError {
    /// Malformed or missing receipt fields; raised before any device call
    #[error("{0}")]
    Validation(String),

    /// Enumerating the printer bus failed
    #[error("{0}")]
    DeviceDiscovery(#[source] PrintError),

    /// The device could not be opened
    #[error("Error opening printer: {0}")]
    DeviceOpen(#[source] PrintError),

    /// Writing to or closing the device failed mid-sequence
    #[error("Error during printing: {0}")]
    PrintSequence(#[source] PrintError),

    /// The blocking device task panicked or was cancelled
    #[error("Print task aborted: {0}")]
    Interrupted(String),
}

impl PrintJobError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type PrintJobResult<T> = Result<T, PrintJobError>;

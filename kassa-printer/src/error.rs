use thiserror::Error;

/// Errors raised while finding, opening or writing to a printer
#[derive(Debug, Error)]
pub enum PrintError {
    /// Device could not be reached
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Device disappeared or rejected the data
    #[error("Printer offline: {0}")]
    Offline(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// Bad address, encoding name or build options
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Nothing suitable attached
    #[error("{0}")]
    NotFound(String),

    #[cfg(feature = "usb")]
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),
}

pub type PrintResult<T> = Result<T, PrintError>;

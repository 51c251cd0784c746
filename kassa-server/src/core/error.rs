use kassa_printer::PrintError;
use thiserror::Error;

/// Startup and listener errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Printer setup failed: {0}")]
    Printer(#[from] PrintError),
}

pub type Result<T> = std::result::Result<T, ServerError>;

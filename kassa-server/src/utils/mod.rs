//! Shared utilities
//!
//! - [`AppError`] - HTTP error responses
//! - logger setup

pub mod error;
pub mod logger;

pub use error::{AppError, AppResult, ErrorResponse};

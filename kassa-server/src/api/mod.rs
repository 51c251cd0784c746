//! API routes
//!
//! - [`health`] - liveness
//! - [`printer`] - printer check and receipt printing

pub mod health;
pub mod printer;

pub use crate::utils::{AppError, AppResult};

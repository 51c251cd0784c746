//! Core module: configuration, state, server and errors
//!
//! - [`Config`] - configuration from the environment
//! - [`ServerState`] - shared handler state
//! - [`Server`] - HTTP listener and signal handling
//! - [`ServerError`] - startup errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{Config, PrinterTransport};
pub use error::{Result, ServerError};
pub use server::{Server, build_app};
pub use state::ServerState;

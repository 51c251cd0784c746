//! Receipt printing
//!
//! - [`model`] - request validation
//! - [`formatter`] - receipt layout as print directives
//! - [`orchestrator`] - device session per print job

pub mod error;
pub mod formatter;
pub mod model;
pub mod money;
pub mod orchestrator;

pub use error::{PrintJobError, PrintJobResult};
pub use formatter::ReceiptFormatter;
pub use model::{LineItem, ReceiptRequest};
pub use orchestrator::{Confirmation, PrintOrchestrator};

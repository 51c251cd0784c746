//! Kassa Server - local receipt printing service
//!
//! # Overview
//!
//! A small HTTP service for a point-of-sale front end. It accepts a receipt
//! as JSON, lays it out for a thermal printer and sends the ESC/POS bytes to
//! the attached device.
//!
//! - **Receipts** (`receipt`): validation, layout, device session per job
//! - **HTTP API** (`api`): `/health`, `/check-printer`, `/print-receipt`
//! - **Core** (`core`): configuration, shared state, listener
//!
//! # Module layout
//!
//! ```text
//! kassa-server/src/
//! ├── core/          # config, state, server, errors
//! ├── api/           # HTTP routes and handlers
//! ├── receipt/       # model, formatter, orchestrator
//! └── utils/         # HTTP errors, logger
//! ```

pub mod api;
pub mod core;
pub mod receipt;
pub mod utils;

pub use crate::core::{Config, Server, ServerState, build_app};
pub use receipt::{PrintJobError, PrintOrchestrator, ReceiptFormatter, ReceiptRequest};
pub use utils::{AppError, AppResult};

pub use utils::logger::{LogSettings, init_logger};

/// Load `.env` and start logging
///
/// Must run before [`Config::from_env`] so both see the same variables.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(e.into());
    }

    init_logger(&LogSettings::from_env());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __ __
   / //_/___ _______________ _
  / ,< / __ `/ ___/ ___/ __ `/
 / /| / /_/ (__  |__  ) /_/ /
/_/ |_\__,_/____/____/\__,_/
        receipt printer
    "#
    );
}

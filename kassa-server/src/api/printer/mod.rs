//! Printer API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /check-printer | GET | Count attached printers |
//! | /print-receipt | POST | Format and print one receipt |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/check-printer", get(handler::check_printer))
        .route("/print-receipt", post(handler::print_receipt))
}

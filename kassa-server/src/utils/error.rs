//! HTTP error responses
//!
//! Every failure path produces a JSON body of the form:
//!
//! ```json
//! { "error": "Error printing receipt", "details": "Invalid items array" }
//! ```
//!
//! | Variant | Status | error |
//! |---------|--------|-------|
//! | NoPrinter | 404 | No printer found. Please connect a printer. |
//! | PrinterCheck | 500 | Error checking printer status |
//! | PrintReceipt | 500 | Error printing receipt |
//! | Unhandled | 500 | Something broke! |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No printer found. Please connect a printer.")]
    /// Discovery returned no devices (404)
    NoPrinter,

    #[error("Error checking printer status: {0}")]
    /// Discovery failed (500)
    PrinterCheck(String),

    #[error("Error printing receipt: {0}")]
    /// Validation, open or print failure (500)
    PrintReceipt(String),

    #[error("Something broke!: {0}")]
    /// Anything not caught by a handler (500)
    Unhandled(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::NoPrinter => (
                StatusCode::NOT_FOUND,
                "No printer found. Please connect a printer.",
                None,
            ),
            AppError::PrinterCheck(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error checking printer status",
                Some(details),
            ),
            AppError::PrintReceipt(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error printing receipt",
                Some(details),
            ),
            AppError::Unhandled(details) => {
                error!(target: "internal", error = %details, "Unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something broke!",
                    Some(details),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: message.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

/// Handler result type
pub type AppResult<T> = Result<T, AppError>;

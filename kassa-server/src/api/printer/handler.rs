//! Printer API Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use serde_json::Value;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPrinterResponse {
    success: bool,
    message: &'static str,
    printer_count: usize,
}

#[derive(Debug, Serialize)]
pub struct PrintResponse {
    success: bool,
    message: String,
}

/// GET /check-printer - count attached printers
pub async fn check_printer(State(state): State<ServerState>) -> AppResult<Json<CheckPrinterResponse>> {
    let devices = state.orchestrator.find_printers().await.map_err(|e| {
        tracing::error!(error = %e, "Printer check failed");
        AppError::PrinterCheck(e.to_string())
    })?;

    if devices.is_empty() {
        return Err(AppError::NoPrinter);
    }

    Ok(Json(CheckPrinterResponse {
        success: true,
        message: "Printer found",
        printer_count: devices.len(),
    }))
}

/// POST /print-receipt - validate and print a receipt
///
/// A body without a JSON content type reads as `{}` and fails validation.
pub async fn print_receipt(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PrintResponse>> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Object(Default::default()),
        Err(rejection) => return Err(AppError::Unhandled(rejection.body_text())),
    };

    let confirmation = state.orchestrator.print_receipt(&body).await.map_err(|e| {
        tracing::error!(error = %e, "Print job failed");
        AppError::PrintReceipt(e.to_string())
    })?;

    Ok(Json(PrintResponse {
        success: true,
        message: confirmation.message,
    }))
}

//! Health check route
//!
//! | Path | Method | Response |
//! |------|--------|----------|
//! | /health | GET | `{"status":"Server is running"}` |

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is running",
    })
}

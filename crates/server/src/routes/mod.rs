//! API route handlers
//!
//! - `auth`: bearer token issuance
//! - `schemas`: filter schema registration
//! - `query`: free-text query resolution
//! - `health`: liveness and readiness probes

pub mod auth;
pub mod health;
pub mod query;
pub mod schemas;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info (GET /, unauthenticated).
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Filtersense Server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/get_token",
            "/api/v1/schemas",
            "/api/v1/query",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 handler for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    contact_enabled: bool,
}

/// Public health check endpoint.
///
/// Reports process liveness only; it never calls the content backend.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "folio-site",
        version: env!("CARGO_PKG_VERSION"),
        contact_enabled: state.contact.is_ok(),
    })
}

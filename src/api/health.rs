//! Health check endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub instruments: usize,
    pub connected_clients: usize,
    pub timestamp: i64,
}

/// Create the health router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(get_health))
}

/// Liveness probe.
async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        instruments: state.store.len(),
        connected_clients: state.registry.client_count(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}

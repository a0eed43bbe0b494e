//! Signal analysis endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use crate::error::AppError;
use crate::services::compute_signal;
use crate::types::SignalDecision;
use crate::AppState;

/// Response for the single-symbol analysis endpoint.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub symbol: String,
    pub analysis: SignalDecision,
    pub timestamp: i64,
}

/// Response for the all-instruments signals endpoint.
#[derive(Debug, Serialize)]
pub struct SignalsResponse {
    pub success: bool,
    pub signals: Vec<SignalDecision>,
    pub timestamp: i64,
}

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analysis/:symbol", get(get_analysis))
        .route("/signals", get(get_signals))
}

/// Get the signal decision for one instrument.
async fn get_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let symbol = symbol.to_uppercase();
    let snapshot = state
        .store
        .snapshot(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("Symbol not found: {}", symbol)))?;

    let analysis = compute_signal(&symbol, &snapshot);
    Ok(Json(AnalysisResponse {
        success: true,
        symbol,
        analysis,
        timestamp: chrono::Utc::now().timestamp_millis(),
    }))
}

/// Get signal decisions for the whole universe.
///
/// Instruments are independent; each decision is computed from its own
/// snapshot and a missing snapshot just skips that symbol.
async fn get_signals(State(state): State<AppState>) -> Json<SignalsResponse> {
    let symbols = state.store.symbols();
    debug!("Computing signals for {} instruments", symbols.len());

    let signals = symbols
        .iter()
        .filter_map(|symbol| {
            state
                .store
                .snapshot(symbol)
                .map(|snapshot| compute_signal(symbol, &snapshot))
        })
        .collect();

    Json(SignalsResponse {
        success: true,
        signals,
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}

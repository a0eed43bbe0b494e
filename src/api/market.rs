//! Market data endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::AppError;
use crate::types::MarketRecord;
use crate::AppState;

/// Response for the market overview endpoint.
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub success: bool,
    pub data: Vec<MarketRecord>,
    pub timestamp: i64,
}

/// Response for the single-symbol endpoint.
#[derive(Debug, Serialize)]
pub struct SymbolResponse {
    pub success: bool,
    pub data: MarketRecord,
    pub timestamp: i64,
}

/// Create the market router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(get_overview))
        .route("/:symbol", get(get_symbol))
}

/// Get every instrument record.
async fn get_overview(State(state): State<AppState>) -> Json<OverviewResponse> {
    Json(OverviewResponse {
        success: true,
        data: state.store.all_records(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}

/// Get one instrument record.
async fn get_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<SymbolResponse>, AppError> {
    let symbol = symbol.to_uppercase();
    let record = state
        .store
        .record(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("Symbol not found: {}", symbol)))?;

    Ok(Json(SymbolResponse {
        success: true,
        data: record,
        timestamp: chrono::Utc::now().timestamp_millis(),
    }))
}

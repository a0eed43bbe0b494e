//! HTTP API routers.

pub mod health;
pub mod market;
pub mod signals;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::types::AssetClass;
use crate::AppState;

/// Server banner returned from the root route.
#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub success: bool,
    pub message: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub markets: MarketCounts,
    pub endpoints: Endpoints,
    pub websocket: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MarketCounts {
    pub crypto: usize,
    pub forex: usize,
    pub indices: usize,
    pub commodities: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub market: &'static str,
    pub symbol: &'static str,
    pub analysis: &'static str,
    pub signals: &'static str,
}

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_banner))
        .merge(health::router())
        .nest("/api/market", market::router())
        .nest("/api/ai", signals::router())
}

/// Server banner with market counts and the endpoint map.
async fn get_banner(State(state): State<AppState>) -> Json<BannerResponse> {
    Json(BannerResponse {
        success: true,
        message: "Quantra API Server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Multi-asset signal server - crypto, forex, indices & commodities",
        markets: MarketCounts {
            crypto: state.store.count_for_class(AssetClass::Crypto),
            forex: state.store.count_for_class(AssetClass::Forex),
            indices: state.store.count_for_class(AssetClass::Indices),
            commodities: state.store.count_for_class(AssetClass::Commodities),
            total: state.store.len(),
        },
        endpoints: Endpoints {
            market: "/api/market/overview",
            symbol: "/api/market/:symbol",
            analysis: "/api/ai/analysis/:symbol",
            signals: "/api/ai/signals",
        },
        websocket: "/ws",
    })
}

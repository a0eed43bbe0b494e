//! Quantra - multi-asset market data server with technical-analysis signals.
//!
//! Streams price observations for crypto, forex, index and commodity
//! instruments into bounded per-instrument histories, and derives a scored
//! BUY/SELL/HOLD recommendation per instrument from a library of technical
//! indicators. The engine is a pure function of a market snapshot; HTTP and
//! WebSocket layers are thin plumbing around it.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;
pub mod websocket;

use std::sync::Arc;

use config::Config;
use services::MarketStore;
use websocket::ClientRegistry;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<MarketStore>,
    pub registry: Arc<ClientRegistry>,
}

// Re-export commonly used items
pub use services::compute_signal;
pub use types::*;

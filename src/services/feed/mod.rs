//! Price feed supplier.
//!
//! Per-asset-class pollers refresh live quotes from upstream APIs (rotating
//! across alternatives and degrading to synthetic data), and a driver loop
//! appends one history point per instrument per tick, then fans the full
//! market snapshot out to WebSocket clients. The engine never sees any of
//! this; it only reads the snapshots the store hands out.

pub mod crypto;
pub mod forex;
pub mod synthetic;

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use tracing::{error, info};

use crate::config::Config;
use crate::services::MarketStore;
use crate::types::{AssetClass, MarketRecord, PriceHistory, ServerMessage};
use crate::websocket::ClientRegistry;

use crypto::{CryptoFeed, CRYPTO_MARKETS};
use forex::{ForexFeed, FOREX_MARKETS};
use synthetic::{CommodityFeed, IndexFeed, COMMODITY_MARKETS, INDEX_MARKETS};

/// Rotation cursor over alternative upstream sources.
///
/// Each poller owns its own cursor. Attempts start at the cursor and walk
/// the remaining sources in order; after a success the cursor advances past
/// the source that answered, spreading load across upstreams.
#[derive(Debug, Clone)]
pub struct SourceRotation {
    index: usize,
    len: usize,
}

impl SourceRotation {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Source indices in try order for the next attempt.
    pub fn order(&self) -> Vec<usize> {
        (0..self.len).map(|i| (self.index + i) % self.len).collect()
    }

    /// Note which source answered; the next attempt starts after it.
    pub fn advance_past(&mut self, used: usize) {
        if self.len > 0 {
            self.index = (used + 1) % self.len;
        }
    }
}

/// Seed the store with the full instrument universe at realistic levels.
pub fn seed_universe(store: &MarketStore) {
    let mut rng = rand::thread_rng();

    for (symbol, _, base) in CRYPTO_MARKETS {
        seed_record(store, &mut rng, symbol, AssetClass::Crypto, *base, 20.0, 1e9, 0.10);
    }
    for (symbol, _, _, base, _) in FOREX_MARKETS {
        seed_record(store, &mut rng, symbol, AssetClass::Forex, *base, 1.0, 1e10, 0.01);
    }
    for (symbol, base, _) in INDEX_MARKETS {
        seed_record(store, &mut rng, symbol, AssetClass::Indices, *base, 2.0, 1e9, 0.02);
    }
    for (symbol, base, _) in COMMODITY_MARKETS {
        seed_record(store, &mut rng, symbol, AssetClass::Commodities, *base, 3.0, 1e9, 0.03);
    }

    info!("Seeded {} instruments across 4 asset classes", store.len());
}

fn seed_record(
    store: &MarketStore,
    rng: &mut impl Rng,
    symbol: &str,
    class: AssetClass,
    base: f64,
    change_spread: f64,
    volume_scale: f64,
    band: f64,
) {
    let price = base * (1.0 + (rng.gen::<f64>() - 0.5) * 0.01);
    // Only crypto instruments carry a market cap.
    let market_cap = (class == AssetClass::Crypto)
        .then(|| price * (rng.gen::<f64>() * 1.0e8 + 1.0e7));

    store.insert(MarketRecord {
        symbol: symbol.to_string(),
        asset_type: class,
        price,
        change_24h: (rng.gen::<f64>() - 0.5) * change_spread,
        volume: rng.gen::<f64>() * volume_scale,
        market_cap,
        high_24h: price * (1.0 + rng.gen::<f64>() * band),
        low_24h: price * (1.0 - rng.gen::<f64>() * band),
        last_update: chrono::Utc::now().timestamp_millis(),
        price_history: PriceHistory::new(),
    });
}

/// Owns the pollers and drives the update loop.
///
/// Single writer: every mutation of the market store happens on this task,
/// so readers only ever observe complete records.
pub struct FeedDriver {
    config: Arc<Config>,
    store: Arc<MarketStore>,
    registry: Arc<ClientRegistry>,
    client: Client,
    crypto: CryptoFeed,
    forex: ForexFeed,
    indices: IndexFeed,
    commodities: CommodityFeed,
}

impl FeedDriver {
    pub fn new(
        config: Arc<Config>,
        store: Arc<MarketStore>,
        registry: Arc<ClientRegistry>,
    ) -> Self {
        let client = Client::builder()
            .user_agent("Quantra/0.1 (Multi-Asset Signal Server)")
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .unwrap_or_else(|_| Client::new());

        let crypto = CryptoFeed::new(
            Duration::from_millis(config.crypto_interval_ms),
            config.cmc_api_key.clone(),
        );
        let forex = ForexFeed::new(Duration::from_millis(config.forex_interval_ms));
        let indices = IndexFeed::new(Duration::from_millis(config.indices_interval_ms));
        let commodities = CommodityFeed::new(Duration::from_millis(config.commodities_interval_ms));

        Self {
            config,
            store,
            registry,
            client,
            crypto,
            forex,
            indices,
            commodities,
        }
    }

    /// Run the update loop until the task is dropped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(Duration::from_millis(self.config.tick_ms));
        info!("Feed driver started, tick every {}ms", self.config.tick_ms);

        loop {
            ticker.tick().await;

            self.crypto.poll(&self.client, &self.store).await;
            self.forex.poll(&self.client, &self.store).await;
            self.indices.poll(&self.store);
            self.commodities.poll(&self.client, &self.store).await;

            self.store.record_tick();
            self.broadcast_market();
        }
    }

    fn broadcast_market(&self) {
        let frame = ServerMessage::MarketUpdate {
            data: self.store.market_map(),
        };
        match serde_json::to_string(&frame) {
            Ok(json) => self.registry.broadcast_all(&json),
            Err(e) => error!("Failed to serialize market update: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_initial_order() {
        let rotation = SourceRotation::new(3);
        assert_eq!(rotation.order(), vec![0, 1, 2]);
    }

    #[test]
    fn test_rotation_advances_past_used_source() {
        let mut rotation = SourceRotation::new(3);
        rotation.advance_past(0);
        assert_eq!(rotation.order(), vec![1, 2, 0]);
        rotation.advance_past(2);
        assert_eq!(rotation.order(), vec![0, 1, 2]);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut rotation = SourceRotation::new(2);
        rotation.advance_past(1);
        assert_eq!(rotation.order(), vec![0, 1]);
    }

    #[test]
    fn test_seed_universe_counts() {
        let store = MarketStore::new();
        seed_universe(&store);

        assert_eq!(store.count_for_class(AssetClass::Crypto), 8);
        assert_eq!(store.count_for_class(AssetClass::Forex), 7);
        assert_eq!(store.count_for_class(AssetClass::Indices), 7);
        assert_eq!(store.count_for_class(AssetClass::Commodities), 7);
        assert_eq!(store.len(), 29);
    }

    #[test]
    fn test_seed_universe_positive_prices() {
        let store = MarketStore::new();
        seed_universe(&store);

        for record in store.all_records() {
            assert!(record.price > 0.0, "{} seeded non-positive", record.symbol);
            assert!(record.price_history.is_empty());
        }
    }
}

//! Shared in-memory market state for the instrument universe.
//!
//! One record per instrument, keyed by symbol. The feed driver is the single
//! writer: it applies quote updates and appends to each bounded price
//! history on every tick. Readers (API handlers, the signal engine) take
//! value snapshots, so no lock is held across a computation.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;

use crate::types::{AssetClass, MarketRecord, MarketSnapshot, QuoteUpdate};

/// Concurrent store of per-instrument market records.
pub struct MarketStore {
    records: DashMap<String, MarketRecord>,
}

impl MarketStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            records: DashMap::new(),
        })
    }

    /// Insert or replace a full record. Used when seeding the universe.
    pub fn insert(&self, record: MarketRecord) {
        self.records.insert(record.symbol.clone(), record);
    }

    /// Apply live quote fields to an instrument, if it exists.
    pub fn apply_quote(&self, symbol: &str, quote: QuoteUpdate) {
        if let Some(mut entry) = self.records.get_mut(symbol) {
            let record = entry.value_mut();
            record.price = quote.price;
            record.change_24h = quote.change_24h;
            if let Some(volume) = quote.volume {
                record.volume = volume;
            }
            if quote.market_cap.is_some() {
                record.market_cap = quote.market_cap;
            }
            record.high_24h = quote.high_24h;
            record.low_24h = quote.low_24h;
            record.last_update = chrono::Utc::now().timestamp_millis();
        }
    }

    /// Append the current price of every instrument to its history.
    ///
    /// Called once per feed tick so the history advances at the tick
    /// cadence regardless of how often upstream quotes refresh.
    pub fn record_tick(&self) {
        let now = chrono::Utc::now().timestamp_millis();
        for mut entry in self.records.iter_mut() {
            let price = entry.price;
            entry.value_mut().price_history.record(price, now);
        }
    }

    /// Clone out one record.
    pub fn record(&self, symbol: &str) -> Option<MarketRecord> {
        self.records.get(symbol).map(|entry| entry.value().clone())
    }

    /// Take a read-only snapshot of the engine inputs for one instrument.
    pub fn snapshot(&self, symbol: &str) -> Option<MarketSnapshot> {
        self.records.get(symbol).map(|entry| entry.value().snapshot())
    }

    /// Clone out every record.
    pub fn all_records(&self) -> Vec<MarketRecord> {
        self.records.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Every record keyed by symbol, in stable order. Used for the
    /// WebSocket market-update frame.
    pub fn market_map(&self) -> BTreeMap<String, MarketRecord> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// All known symbols.
    pub fn symbols(&self) -> Vec<String> {
        self.records.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of instruments in one asset class.
    pub fn count_for_class(&self, class: AssetClass) -> usize {
        self.records
            .iter()
            .filter(|entry| entry.asset_type == class)
            .count()
    }

    /// Total number of instruments.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no instruments.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Maximum number of price points retained per instrument.
pub const HISTORY_CAPACITY: usize = 100;

/// Asset class an instrument belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Crypto,
    Forex,
    Indices,
    Commodities,
}

impl AssetClass {
    /// All asset classes, in display order.
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Crypto,
        AssetClass::Forex,
        AssetClass::Indices,
        AssetClass::Commodities,
    ];

    /// Get display name for this asset class.
    pub fn name(&self) -> &'static str {
        match self {
            AssetClass::Crypto => "Crypto",
            AssetClass::Forex => "Forex",
            AssetClass::Indices => "Indices",
            AssetClass::Commodities => "Commodities",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::Crypto => write!(f, "crypto"),
            AssetClass::Forex => write!(f, "forex"),
            AssetClass::Indices => write!(f, "indices"),
            AssetClass::Commodities => write!(f, "commodities"),
        }
    }
}

impl std::str::FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crypto" => Ok(Self::Crypto),
            "forex" => Ok(Self::Forex),
            "indices" => Ok(Self::Indices),
            "commodities" => Ok(Self::Commodities),
            _ => Err(format!("Unknown asset class: {}", s)),
        }
    }
}

/// A single observed price with its arrival timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
}

/// Bounded price history, newest first.
///
/// Backed by a capped deque: recording pushes to the front and evicts the
/// oldest point once the capacity is reached, so inserts stay O(1) amortized.
/// Serializes as a plain array of points, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceHistory {
    points: VecDeque<PricePoint>,
}

impl PriceHistory {
    /// Create an empty history with the standard capacity.
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Record a new observation, evicting the oldest point at capacity.
    pub fn record(&mut self, price: f64, timestamp: i64) {
        self.points.push_front(PricePoint { price, timestamp });
        while self.points.len() > HISTORY_CAPACITY {
            self.points.pop_back();
        }
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the history holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent observation, if any.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.front()
    }

    /// Iterate over the retained points, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    /// Copy out the price values, newest first.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}

/// Full per-instrument market record held by the store and sent on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecord {
    pub symbol: String,
    pub asset_type: AssetClass,
    pub price: f64,
    /// 24h change, percent.
    pub change_24h: f64,
    pub volume: f64,
    pub market_cap: Option<f64>,
    pub high_24h: f64,
    pub low_24h: f64,
    /// Unix timestamp in milliseconds of the last quote update.
    pub last_update: i64,
    pub price_history: PriceHistory,
}

impl MarketRecord {
    /// Take a read-only snapshot of the fields the signal engine consumes.
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            symbol: self.symbol.clone(),
            asset_type: self.asset_type,
            price: self.price,
            change_24h: self.change_24h,
            volume: self.volume,
            price_history: self.price_history.clone(),
        }
    }
}

/// Live quote fields applied to a market record on each feed refresh.
#[derive(Debug, Clone, Copy)]
pub struct QuoteUpdate {
    pub price: f64,
    pub change_24h: f64,
    pub volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub high_24h: f64,
    pub low_24h: f64,
}

/// Read-only market state consumed by the signal engine.
///
/// Invariant: `price > 0`. The history may hold 0..=100 points; the engine
/// degrades to neutral defaults when it is shorter than an indicator window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub symbol: String,
    pub asset_type: AssetClass,
    pub price: f64,
    /// 24h change, percent.
    pub change_24h: f64,
    pub volume: f64,
    pub price_history: PriceHistory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_class_roundtrip() {
        for class in AssetClass::ALL {
            let parsed: AssetClass = class.to_string().parse().unwrap();
            assert_eq!(parsed, class);
        }
    }

    #[test]
    fn test_asset_class_unknown() {
        assert!("bonds".parse::<AssetClass>().is_err());
    }

    #[test]
    fn test_history_newest_first() {
        let mut history = PriceHistory::new();
        history.record(1.0, 100);
        history.record(2.0, 200);
        history.record(3.0, 300);

        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().unwrap().price, 3.0);
        assert_eq!(history.prices(), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_history_evicts_oldest_at_capacity() {
        let mut history = PriceHistory::new();
        for i in 0..(HISTORY_CAPACITY + 25) {
            history.record(i as f64, i as i64);
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        // Newest survives, oldest 25 were evicted.
        assert_eq!(history.latest().unwrap().price, 124.0);
        assert_eq!(history.prices().last().copied(), Some(25.0));
    }

    #[test]
    fn test_history_serializes_as_array() {
        let mut history = PriceHistory::new();
        history.record(42.0, 1_000);

        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["price"], 42.0);
        assert_eq!(json[0]["timestamp"], 1_000);
    }

    #[test]
    fn test_market_record_wire_field_names() {
        let record = MarketRecord {
            symbol: "BTC".to_string(),
            asset_type: AssetClass::Crypto,
            price: 45_000.0,
            change_24h: 3.2,
            volume: 2e9,
            market_cap: Some(8.8e11),
            high_24h: 46_000.0,
            low_24h: 44_000.0,
            last_update: 1_700_000_000_000,
            price_history: PriceHistory::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["assetType"], "crypto");
        assert_eq!(json["change24h"], 3.2);
        assert_eq!(json["priceHistory"], serde_json::json!([]));
        assert_eq!(json["marketCap"], 8.8e11);
    }

    #[test]
    fn test_snapshot_copies_engine_inputs() {
        let mut record = MarketRecord {
            symbol: "ETH".to_string(),
            asset_type: AssetClass::Crypto,
            price: 3_000.0,
            change_24h: -1.5,
            volume: 5e8,
            market_cap: None,
            high_24h: 3_100.0,
            low_24h: 2_900.0,
            last_update: 0,
            price_history: PriceHistory::new(),
        };
        record.price_history.record(2_990.0, 1);
        record.price_history.record(3_000.0, 2);

        let snapshot = record.snapshot();
        assert_eq!(snapshot.symbol, "ETH");
        assert_eq!(snapshot.price, 3_000.0);
        assert_eq!(snapshot.price_history.len(), 2);
    }
}

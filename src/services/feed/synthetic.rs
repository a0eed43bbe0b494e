//! Indices and commodities feeds.
//!
//! Index quotes are modeled synthetically around realistic levels (no free
//! real-time upstream exists for CFD-style index symbols). Commodities try
//! a spot-metals API for gold and silver and model the rest.

use std::time::{Duration, Instant};

use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::services::MarketStore;
use crate::types::QuoteUpdate;

const METALS_URL: &str = "https://api.metals.live/v1/spot";

/// Tracked index instruments: symbol, base level, daily volatility (percent).
pub const INDEX_MARKETS: &[(&str, f64, f64)] = &[
    ("US30", 35_000.0, 0.8),
    ("NAS100", 15_000.0, 1.2),
    ("SPX500", 4_500.0, 0.6),
    ("UK100", 7_500.0, 0.7),
    ("GER30", 16_000.0, 0.9),
    ("FRA40", 7_200.0, 0.8),
    ("JPN225", 32_000.0, 1.0),
];

/// Tracked commodity instruments: symbol, base price, daily volatility
/// (percent).
pub const COMMODITY_MARKETS: &[(&str, f64, f64)] = &[
    ("XAUUSD", 2_000.0, 2.0),
    ("XAGUSD", 25.0, 3.0),
    ("USOIL", 75.0, 2.0),
    ("UKOIL", 78.0, 2.0),
    ("NATGAS", 3.5, 2.0),
    ("COPPER", 4.2, 2.0),
    ("WHEAT", 6.5, 2.0),
];

#[derive(Debug, Deserialize)]
struct MetalsSpot {
    gold: Option<f64>,
    silver: Option<f64>,
}

/// Synthetic index quote model.
pub struct IndexFeed {
    interval: Duration,
    last_fetch: Option<Instant>,
}

impl IndexFeed {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fetch: None,
        }
    }

    /// Refresh index quotes if the interval has elapsed.
    pub fn poll(&mut self, store: &MarketStore) {
        if !self.last_fetch.map_or(true, |t| t.elapsed() >= self.interval) {
            debug!("Skipping indices refresh, interval not elapsed");
            return;
        }
        self.last_fetch = Some(Instant::now());

        let mut rng = rand::thread_rng();
        for (symbol, base, volatility) in INDEX_MARKETS {
            let change = (rng.gen::<f64>() - 0.5) * volatility;
            let price = base * (1.0 + change * 0.01);
            store.apply_quote(
                symbol,
                QuoteUpdate {
                    price,
                    change_24h: change,
                    volume: None,
                    market_cap: None,
                    high_24h: price * (1.0 + rng.gen::<f64>() * 0.02),
                    low_24h: price * (1.0 - rng.gen::<f64>() * 0.02),
                },
            );
        }
        info!("Index quotes updated");
    }
}

/// Commodity poller: spot metals upstream for gold/silver, synthetic model
/// for everything else.
pub struct CommodityFeed {
    interval: Duration,
    last_fetch: Option<Instant>,
}

impl CommodityFeed {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fetch: None,
        }
    }

    /// Refresh commodity quotes if the interval has elapsed.
    pub async fn poll(&mut self, client: &Client, store: &MarketStore) {
        if !self.last_fetch.map_or(true, |t| t.elapsed() >= self.interval) {
            debug!("Skipping commodities refresh, interval not elapsed");
            return;
        }
        self.last_fetch = Some(Instant::now());

        let mut metals_applied = false;
        match self.fetch_metals(client).await {
            Ok(spot) => {
                let mut rng = rand::thread_rng();
                if let Some(gold) = spot.gold {
                    apply_commodity(store, &mut rng, "XAUUSD", gold, 2.0);
                    metals_applied = true;
                }
                if let Some(silver) = spot.silver {
                    apply_commodity(store, &mut rng, "XAGUSD", silver, 3.0);
                    metals_applied = true;
                }
                if metals_applied {
                    info!("Gold and silver quotes updated from metals API");
                }
            }
            Err(e) => warn!("Metals API failed: {}, using fallback pricing", e),
        }

        let mut rng = rand::thread_rng();
        for (symbol, base, volatility) in COMMODITY_MARKETS {
            // Metals already refreshed from the upstream this round.
            if metals_applied && (*symbol == "XAUUSD" || *symbol == "XAGUSD") {
                continue;
            }
            let price = base + (rng.gen::<f64>() - 0.5) * base * 0.02;
            apply_commodity(store, &mut rng, symbol, price, *volatility);
        }
        info!("Commodity quotes updated");
    }

    async fn fetch_metals(&self, client: &Client) -> Result<MetalsSpot> {
        let spot: MetalsSpot = client
            .get(METALS_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(spot)
    }
}

fn apply_commodity(
    store: &MarketStore,
    rng: &mut impl Rng,
    symbol: &str,
    price: f64,
    volatility: f64,
) {
    store.apply_quote(
        symbol,
        QuoteUpdate {
            price,
            change_24h: (rng.gen::<f64>() - 0.5) * volatility,
            volume: None,
            market_cap: None,
            high_24h: price * (1.0 + rng.gen::<f64>() * 0.02),
            low_24h: price * (1.0 - rng.gen::<f64>() * 0.02),
        },
    );
}

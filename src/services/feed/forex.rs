//! Forex quote polling.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::services::MarketStore;
use crate::types::QuoteUpdate;

const EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Tracked forex pairs: symbol, quoted currency, whether USD is the base
/// side, fallback rate, synthetic 24h-change volatility (percent).
pub const FOREX_MARKETS: &[(&str, &str, bool, f64, f64)] = &[
    ("EURUSD", "EUR", false, 1.08, 1.0),
    ("GBPUSD", "GBP", false, 1.25, 1.2),
    ("USDJPY", "JPY", true, 150.0, 1.5),
    ("AUDUSD", "AUD", false, 0.65, 1.5),
    ("USDCAD", "CAD", true, 1.35, 1.0),
    ("NZDUSD", "NZD", false, 0.60, 1.8),
    ("USDCHF", "CHF", true, 0.88, 0.8),
];

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    rates: HashMap<String, f64>,
}

/// Forex poller against a USD-based rates table, with synthetic fallback.
pub struct ForexFeed {
    interval: Duration,
    last_fetch: Option<Instant>,
}

impl ForexFeed {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fetch: None,
        }
    }

    fn due(&self) -> bool {
        self.last_fetch.map_or(true, |t| t.elapsed() >= self.interval)
    }

    /// Refresh forex quotes if the fetch interval has elapsed.
    pub async fn poll(&mut self, client: &Client, store: &MarketStore) {
        if !self.due() {
            return;
        }
        self.last_fetch = Some(Instant::now());

        match self.fetch_rates(client).await {
            Ok(rates) => {
                apply_rates(store, &rates);
                info!("Forex quotes updated from exchange-rate API");
            }
            Err(e) => {
                warn!("Forex fetch failed: {}, using fallback rates", e);
                apply_fallback(store);
            }
        }
    }

    async fn fetch_rates(&self, client: &Client) -> Result<HashMap<String, f64>> {
        let response: ExchangeRateResponse = client
            .get(EXCHANGE_RATE_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.rates)
    }
}

fn apply_rates(store: &MarketStore, rates: &HashMap<String, f64>) {
    let mut rng = rand::thread_rng();
    for (symbol, currency, usd_base, _, volatility) in FOREX_MARKETS {
        let Some(rate) = rates.get(*currency).copied().filter(|r| *r > 0.0) else {
            continue;
        };
        // The table quotes everything against USD; invert for pairs where
        // USD is the quote side.
        let price = if *usd_base { rate } else { 1.0 / rate };
        store.apply_quote(
            symbol,
            QuoteUpdate {
                price,
                change_24h: (rng.gen::<f64>() - 0.5) * volatility,
                volume: None,
                market_cap: None,
                high_24h: price * (1.0 + rng.gen::<f64>() * 0.01),
                low_24h: price * (1.0 - rng.gen::<f64>() * 0.01),
            },
        );
    }
}

/// Synthetic rates around realistic levels.
fn apply_fallback(store: &MarketStore) {
    let mut rng = rand::thread_rng();
    for (symbol, _, _, base, _) in FOREX_MARKETS {
        let change = (rng.gen::<f64>() - 0.5) * 1.0;
        let price = base * (1.0 + change * 0.01);
        store.apply_quote(
            symbol,
            QuoteUpdate {
                price,
                change_24h: change,
                volume: None,
                market_cap: None,
                high_24h: price * (1.0 + rng.gen::<f64>() * 0.01),
                low_24h: price * (1.0 - rng.gen::<f64>() * 0.01),
            },
        );
    }
}

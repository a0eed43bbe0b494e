//! Crypto quote polling with upstream rotation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::services::MarketStore;
use crate::types::QuoteUpdate;

use super::SourceRotation;

const COINGECKO_URL: &str = "https://api.coingecko.com/api/v3/simple/price";
const COINCAP_URL: &str = "https://api.coincap.io/v2/assets";
const CMC_URL: &str = "https://pro-api.coinmarketcap.com/v1/cryptocurrency/quotes/latest";

/// Tracked crypto instruments: symbol, CoinGecko id, fallback base price.
pub const CRYPTO_MARKETS: &[(&str, &str, f64)] = &[
    ("BTC", "bitcoin", 45_000.0),
    ("ETH", "ethereum", 3_000.0),
    ("ADA", "cardano", 0.5),
    ("SOL", "solana", 100.0),
    ("DOT", "polkadot", 6.0),
    ("LINK", "chainlink", 15.0),
    ("AVAX", "avalanche-2", 25.0),
    ("MATIC", "matic-network", 0.8),
];

/// One upstream quote, normalized across sources.
#[derive(Debug, Clone, Copy)]
struct CryptoQuote {
    price: f64,
    change_24h: f64,
    volume: f64,
    market_cap: f64,
}

#[derive(Debug, Deserialize)]
struct CoinGeckoQuote {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
    usd_24h_vol: Option<f64>,
    usd_market_cap: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CoinCapResponse {
    data: Vec<CoinCapAsset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinCapAsset {
    symbol: String,
    price_usd: String,
    change_percent24_hr: Option<String>,
    volume_usd24_hr: Option<String>,
    market_cap_usd: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CmcResponse {
    data: HashMap<String, CmcAsset>,
}

#[derive(Debug, Deserialize)]
struct CmcAsset {
    quote: CmcQuoteMap,
}

#[derive(Debug, Deserialize)]
struct CmcQuoteMap {
    #[serde(rename = "USD")]
    usd: CmcUsdQuote,
}

#[derive(Debug, Deserialize)]
struct CmcUsdQuote {
    price: f64,
    percent_change_24h: Option<f64>,
    volume_24h: Option<f64>,
    market_cap: Option<f64>,
}

/// Crypto poller: rotates through upstream APIs and falls back to synthetic
/// quotes when all of them fail.
pub struct CryptoFeed {
    interval: Duration,
    last_fetch: Option<Instant>,
    rotation: SourceRotation,
    cmc_api_key: Option<String>,
}

impl CryptoFeed {
    pub fn new(interval: Duration, cmc_api_key: Option<String>) -> Self {
        // CoinGecko and CoinCap are always available; CoinMarketCap joins
        // the rotation when a key is configured.
        let sources = if cmc_api_key.is_some() { 3 } else { 2 };
        Self {
            interval,
            last_fetch: None,
            rotation: SourceRotation::new(sources),
            cmc_api_key,
        }
    }

    fn due(&self) -> bool {
        self.last_fetch.map_or(true, |t| t.elapsed() >= self.interval)
    }

    /// Refresh crypto quotes if the fetch interval has elapsed.
    pub async fn poll(&mut self, client: &Client, store: &MarketStore) {
        if !self.due() {
            return;
        }
        self.last_fetch = Some(Instant::now());

        for source in self.rotation.order() {
            let quotes = match source {
                0 => self.fetch_coingecko(client).await,
                1 => self.fetch_coincap(client).await,
                _ => self.fetch_coinmarketcap(client).await,
            };

            match quotes {
                Ok(quotes) if !quotes.is_empty() => {
                    apply_quotes(store, &quotes);
                    self.rotation.advance_past(source);
                    info!("Crypto quotes updated from source {}", source + 1);
                    return;
                }
                Ok(_) => {
                    debug!("Crypto source {} returned no quotes, trying next", source + 1)
                }
                Err(e) => warn!("Crypto source {} failed: {}, trying next", source + 1, e),
            }
        }

        warn!("All crypto sources failed, using fallback quotes");
        apply_fallback(store);
    }

    async fn fetch_coingecko(&self, client: &Client) -> Result<HashMap<String, CryptoQuote>> {
        let ids: Vec<&str> = CRYPTO_MARKETS.iter().map(|(_, id, _)| *id).collect();
        let response: HashMap<String, CoinGeckoQuote> = client
            .get(COINGECKO_URL)
            .query(&[
                ("ids", ids.join(",")),
                ("vs_currencies", "usd".to_string()),
                ("include_24hr_change", "true".to_string()),
                ("include_24hr_vol", "true".to_string()),
                ("include_market_cap", "true".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut quotes = HashMap::new();
        for (symbol, id, _) in CRYPTO_MARKETS {
            if let Some(quote) = response.get(*id) {
                if let Some(price) = quote.usd {
                    quotes.insert(
                        symbol.to_string(),
                        CryptoQuote {
                            price,
                            change_24h: quote.usd_24h_change.unwrap_or(0.0),
                            volume: quote.usd_24h_vol.unwrap_or(0.0),
                            market_cap: quote.usd_market_cap.unwrap_or(0.0),
                        },
                    );
                }
            }
        }
        Ok(quotes)
    }

    async fn fetch_coincap(&self, client: &Client) -> Result<HashMap<String, CryptoQuote>> {
        let response: CoinCapResponse = client
            .get(COINCAP_URL)
            .query(&[("limit", "50")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut quotes = HashMap::new();
        for asset in response.data {
            let tracked = CRYPTO_MARKETS.iter().any(|(s, _, _)| *s == asset.symbol);
            if !tracked {
                continue;
            }
            let Ok(price) = asset.price_usd.parse::<f64>() else {
                continue;
            };
            let parse = |value: Option<String>| {
                value.and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0)
            };
            quotes.insert(
                asset.symbol.clone(),
                CryptoQuote {
                    price,
                    change_24h: parse(asset.change_percent24_hr),
                    volume: parse(asset.volume_usd24_hr),
                    market_cap: parse(asset.market_cap_usd),
                },
            );
        }
        Ok(quotes)
    }

    async fn fetch_coinmarketcap(&self, client: &Client) -> Result<HashMap<String, CryptoQuote>> {
        let api_key = self
            .cmc_api_key
            .as_deref()
            .ok_or_else(|| AppError::UpstreamFeed("CoinMarketCap key not configured".into()))?;

        let symbols: Vec<&str> = CRYPTO_MARKETS.iter().map(|(s, _, _)| *s).collect();
        let response: CmcResponse = client
            .get(CMC_URL)
            .header("X-CMC_PRO_API_KEY", api_key)
            .query(&[("symbol", symbols.join(",")), ("convert", "USD".to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut quotes = HashMap::new();
        for (symbol, asset) in response.data {
            quotes.insert(
                symbol,
                CryptoQuote {
                    price: asset.quote.usd.price,
                    change_24h: asset.quote.usd.percent_change_24h.unwrap_or(0.0),
                    volume: asset.quote.usd.volume_24h.unwrap_or(0.0),
                    market_cap: asset.quote.usd.market_cap.unwrap_or(0.0),
                },
            );
        }
        Ok(quotes)
    }
}

fn apply_quotes(store: &MarketStore, quotes: &HashMap<String, CryptoQuote>) {
    let mut rng = rand::thread_rng();
    for (symbol, quote) in quotes {
        store.apply_quote(
            symbol,
            QuoteUpdate {
                price: quote.price,
                change_24h: quote.change_24h,
                volume: Some(quote.volume),
                market_cap: Some(quote.market_cap),
                high_24h: quote.price * (1.0 + rng.gen::<f64>() * 0.05),
                low_24h: quote.price * (1.0 - rng.gen::<f64>() * 0.05),
            },
        );
    }
}

/// Synthetic quotes around realistic base prices.
fn apply_fallback(store: &MarketStore) {
    let mut rng = rand::thread_rng();
    for (symbol, _, base) in CRYPTO_MARKETS {
        let change = (rng.gen::<f64>() - 0.5) * 5.0;
        let price = base * (1.0 + change * 0.01);
        store.apply_quote(
            symbol,
            QuoteUpdate {
                price,
                change_24h: change,
                volume: Some(rng.gen::<f64>() * 1_000_000_000.0),
                market_cap: None,
                high_24h: price * (1.0 + rng.gen::<f64>() * 0.03),
                low_24h: price * (1.0 - rng.gen::<f64>() * 0.03),
            },
        );
    }
}

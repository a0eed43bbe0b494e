use std::env;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Feed driver tick interval (ms). History advances at this cadence.
    pub tick_ms: u64,
    /// Minimum time between crypto upstream fetches (ms).
    pub crypto_interval_ms: u64,
    /// Minimum time between forex upstream fetches (ms).
    pub forex_interval_ms: u64,
    /// Minimum time between indices refreshes (ms).
    pub indices_interval_ms: u64,
    /// Minimum time between commodities refreshes (ms).
    pub commodities_interval_ms: u64,
    /// Timeout for upstream HTTP requests (ms).
    pub request_timeout_ms: u64,
    /// CoinMarketCap API key (optional, adds a crypto source when present).
    pub cmc_api_key: Option<String>,
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        Self {
            host,
            port,
            tick_ms: env_u64("TICK_MS", 1_000),
            crypto_interval_ms: env_u64("CRYPTO_FETCH_INTERVAL_MS", 5_000),
            forex_interval_ms: env_u64("FOREX_FETCH_INTERVAL_MS", 3_000),
            indices_interval_ms: env_u64("INDICES_FETCH_INTERVAL_MS", 5_000),
            commodities_interval_ms: env_u64("COMMODITIES_FETCH_INTERVAL_MS", 5_000),
            request_timeout_ms: env_u64("REQUEST_TIMEOUT_MS", 5_000),
            cmc_api_key: env::var("CMC_API_KEY").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_manual_values() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 5000,
            tick_ms: 1_000,
            crypto_interval_ms: 5_000,
            forex_interval_ms: 3_000,
            indices_interval_ms: 5_000,
            commodities_interval_ms: 5_000,
            request_timeout_ms: 5_000,
            cmc_api_key: None,
        };

        assert_eq!(config.port, 5000);
        assert_eq!(config.forex_interval_ms, 3_000);
        assert!(config.cmc_api_key.is_none());
    }

    #[test]
    fn test_config_clone() {
        let config = Config {
            host: "test".to_string(),
            port: 1234,
            tick_ms: 500,
            crypto_interval_ms: 1_000,
            forex_interval_ms: 1_000,
            indices_interval_ms: 1_000,
            commodities_interval_ms: 1_000,
            request_timeout_ms: 2_000,
            cmc_api_key: Some("key".to_string()),
        };

        let cloned = config.clone();
        assert_eq!(cloned.host, config.host);
        assert_eq!(cloned.cmc_api_key, config.cmc_api_key);
    }
}

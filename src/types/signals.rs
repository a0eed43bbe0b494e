use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSignal {
    Buy,
    Sell,
    Hold,
}

impl TradeSignal {
    /// Get display label for this signal.
    pub fn label(&self) -> &'static str {
        match self {
            TradeSignal::Buy => "BUY",
            TradeSignal::Sell => "SELL",
            TradeSignal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Directional price trend over the recent history window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    /// Get display label for this trend.
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
            Trend::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categorical volume activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    Low,
    Normal,
    High,
}

/// Market sentiment classification from price change, volume and volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    VeryBullish,
    Bullish,
    Neutral,
    Bearish,
    VeryBearish,
}

/// Stringified indicator values reported alongside a decision.
///
/// Values are formatted to two decimals (four for MACD) with "N/A" standing
/// in wherever the history is too short for the indicator's window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorReadout {
    pub volatility: String,
    pub momentum: String,
    pub support: String,
    pub resistance: String,
    pub sma20: String,
    pub sma50: String,
    pub rsi: String,
    pub macd: String,
    pub bollinger_upper: String,
    pub bollinger_lower: String,
    pub stochastic: String,
}

/// Output of the signal engine for one instrument.
///
/// Built fresh on every request and never mutated afterwards. `entry_price`
/// and `exit_price` serialize as `null` when the signal carries no levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalDecision {
    pub symbol: String,
    pub signal: TradeSignal,
    /// Confidence in the recommendation, clamped to [30, 95].
    pub confidence: f64,
    pub trend: Trend,
    /// Signal strength in [0, 100], scaled from realized volatility.
    pub strength: f64,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Reward-to-risk ratio formatted to two decimals.
    pub risk_reward: String,
    /// Multi-line human-readable rationale.
    pub analysis: String,
    pub technical_indicators: IndicatorReadout,
}

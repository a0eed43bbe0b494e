//! Relative Strength Index (RSI).

/// Momentum oscillator in [0, 100] from the gain/loss ratio of the most
/// recent `period` consecutive price deltas.
///
/// `prices` is ordered newest first and `period + 1` points are required
/// (one extra for the first delta). A window with no losing deltas returns
/// exactly 100.
pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if prices.len() < period + 1 {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;

    for i in 1..=period {
        let change = prices[i] - prices[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_insufficient_data() {
        let prices = vec![1.0; 14];
        assert!(rsi(&prices, 14).is_none());
    }

    #[test]
    fn test_rsi_requires_period_plus_one() {
        let prices = vec![1.0; 15];
        assert!(rsi(&prices, 14).is_some());
    }

    #[test]
    fn test_rsi_all_gains_is_exactly_100() {
        // Every delta positive over the window: no losses, RSI pegs at 100.
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&prices, 14), Some(100.0));
    }

    #[test]
    fn test_rsi_constant_series_is_100() {
        // Zero deltas count as zero loss, which also pegs the ratio.
        let prices = vec![50.0; 20];
        assert_eq!(rsi(&prices, 14), Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses_is_zero() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let value = rsi(&prices, 14).unwrap();
        assert!(value.abs() < 1e-9, "expected 0, got {}", value);
    }

    #[test]
    fn test_rsi_within_bounds() {
        let prices: Vec<f64> = (0..30)
            .map(|i| 100.0 + ((i * 37) % 11) as f64 - 5.0)
            .collect();
        let value = rsi(&prices, 14).unwrap();
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn test_rsi_balanced_deltas_is_50() {
        // Alternating +1/-1 deltas: equal average gain and loss.
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + (i % 2) as f64).collect();
        let value = rsi(&prices, 14).unwrap();
        assert!((value - 50.0).abs() < 1e-9, "expected 50, got {}", value);
    }
}

//! Stochastic oscillator (%K).

/// Position of the current price within the high-low range of the most
/// recent `period` observations, in percent.
///
/// `prices` is ordered newest first; the current price is `prices[0]`.
/// Returns 50 for a flat window (highest equals lowest) and `None` when
/// fewer than `period` points are available.
pub fn stochastic(prices: &[f64], period: usize) -> Option<f64> {
    if prices.len() < period {
        return None;
    }

    let window = &prices[..period];
    let highest = window.iter().cloned().fold(f64::MIN, f64::max);
    let lowest = window.iter().cloned().fold(f64::MAX, f64::min);
    let current = *prices.first()?;

    if highest == lowest {
        return Some(50.0);
    }

    Some((current - lowest) / (highest - lowest) * 100.0)
}

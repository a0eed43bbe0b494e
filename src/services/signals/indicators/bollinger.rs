//! Bollinger Bands.

use super::sma::sma;

/// Bollinger band levels around the period SMA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bollinger {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// SMA plus/minus `std_dev` population standard deviations over the most
/// recent `period` observations.
///
/// `prices` is ordered newest first. Returns `None` when fewer than `period`
/// points are available.
pub fn bollinger_bands(prices: &[f64], period: usize, std_dev: f64) -> Option<Bollinger> {
    if prices.len() < period {
        return None;
    }

    let middle = sma(prices, period)?;

    let variance = prices[..period]
        .iter()
        .map(|price| (price - middle).powi(2))
        .sum::<f64>()
        / period as f64;
    let deviation = variance.sqrt();

    Some(Bollinger {
        upper: middle + std_dev * deviation,
        middle,
        lower: middle - std_dev * deviation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_insufficient_data() {
        let prices = vec![1.0; 19];
        assert!(bollinger_bands(&prices, 20, 2.0).is_none());
    }

    #[test]
    fn test_bollinger_constant_series_collapses() {
        let prices = vec![10.0; 25];
        let bands = bollinger_bands(&prices, 20, 2.0).unwrap();
        assert_eq!(bands.upper, 10.0);
        assert_eq!(bands.middle, 10.0);
        assert_eq!(bands.lower, 10.0);
    }

    #[test]
    fn test_bollinger_band_ordering() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i % 7) as f64).collect();
        let bands = bollinger_bands(&prices, 20, 2.0).unwrap();
        assert!(bands.upper >= bands.middle);
        assert!(bands.middle >= bands.lower);
    }

    #[test]
    fn test_bollinger_symmetric_around_middle() {
        let prices: Vec<f64> = (0..20).map(|i| 50.0 + i as f64).collect();
        let bands = bollinger_bands(&prices, 20, 2.0).unwrap();
        let up = bands.upper - bands.middle;
        let down = bands.middle - bands.lower;
        assert!((up - down).abs() < 1e-9);
    }

    #[test]
    fn test_bollinger_population_variance() {
        // Four points, period 4: mean 2.5, population variance 1.25.
        let prices = vec![1.0, 2.0, 3.0, 4.0];
        let bands = bollinger_bands(&prices, 4, 2.0).unwrap();
        let expected_dev = 1.25f64.sqrt();
        assert!((bands.upper - (2.5 + 2.0 * expected_dev)).abs() < 1e-9);
        assert!((bands.lower - (2.5 - 2.0 * expected_dev)).abs() < 1e-9);
    }
}

//! Signal engine: turns a market snapshot into a trading recommendation.
//!
//! A pure, synchronous computation with no I/O and no shared state: every
//! invocation reads one snapshot and builds one decision, so calls are safe
//! to run concurrently across instruments. Short history never fails a
//! computation; indicators report "N/A" and the derived metrics fall back to
//! neutral defaults, which biases the decision toward HOLD.

use crate::types::{
    IndicatorReadout, MarketSnapshot, Sentiment, SignalDecision, TradeSignal, Trend, VolumeTrend,
};

use super::indicators::IndicatorSet;

/// Minimum and maximum confidence reported for any decision.
const CONFIDENCE_FLOOR: f64 = 30.0;
const CONFIDENCE_CEILING: f64 = 95.0;

/// Score a decision must reach, and the margin it must hold over the
/// opposing side, before leaving HOLD. The margin keeps marginal score
/// mixes from flip-flopping between ticks.
const DECISION_THRESHOLD: u32 = 6;
const DECISION_MARGIN: u32 = 2;

/// Compute the trading decision for one instrument.
///
/// Deterministic for identical snapshots and total for any snapshot with a
/// positive price: insufficient history degrades the output, it never
/// raises.
pub fn compute_signal(symbol: &str, snapshot: &MarketSnapshot) -> SignalDecision {
    let price = snapshot.price;
    let prices = snapshot.price_history.prices();

    let volatility = volatility(&prices);
    let trend = determine_trend(&prices);
    let momentum = momentum(&prices);
    let (support, resistance) = support_resistance(&prices);
    let indicators = IndicatorSet::compute(&prices);
    let volume_trend = volume_trend(&prices, snapshot.volume);
    let sentiment = sentiment(snapshot.change_24h, snapshot.volume, volatility);

    let signal = score_signal(
        price,
        trend,
        momentum,
        volume_trend,
        sentiment,
        &indicators,
    );
    let confidence = confidence(signal, trend, momentum, volume_trend, &indicators);
    let levels = trade_levels(price, signal, support, resistance, &indicators);

    SignalDecision {
        symbol: symbol.to_string(),
        signal,
        confidence,
        trend,
        strength: (volatility * 10.0).min(100.0),
        entry_price: levels.entry,
        exit_price: levels.exit,
        stop_loss: levels.stop_loss,
        take_profit: levels.take_profit,
        risk_reward: levels.risk_reward,
        analysis: analysis_text(symbol, signal, trend, momentum, support, resistance),
        technical_indicators: readout(volatility, momentum, support, resistance, &indicators),
    }
}

/// Standard deviation of period-over-period returns, scaled x100.
///
/// Returns 0 for fewer than two points.
fn volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = prices
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect();

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / returns.len() as f64;

    variance.sqrt() * 100.0
}

/// Classify the trend by comparing the five most recent points against the
/// five before them. Short history is neutral.
fn determine_trend(prices: &[f64]) -> Trend {
    if prices.len() < 5 {
        return Trend::Neutral;
    }

    let recent = &prices[..5];
    let older = &prices[5..prices.len().min(10)];
    if older.is_empty() {
        return Trend::Neutral;
    }

    let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
    let older_avg = older.iter().sum::<f64>() / older.len() as f64;
    let change = (recent_avg - older_avg) / older_avg;

    if change > 0.02 {
        Trend::Bullish
    } else if change < -0.02 {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}

/// Relative percent change between the recent-five and older-five groups.
///
/// Returns 0 for fewer than ten points.
fn momentum(prices: &[f64]) -> f64 {
    if prices.len() < 10 {
        return 0.0;
    }

    let recent_avg = prices[..5].iter().sum::<f64>() / 5.0;
    let older_avg = prices[5..10].iter().sum::<f64>() / 5.0;

    (recent_avg - older_avg) / older_avg * 100.0
}

/// Support and resistance as the 10th and 90th percentile of the window.
///
/// Both are 0 for fewer than ten points.
fn support_resistance(prices: &[f64]) -> (f64, f64) {
    if prices.len() < 10 {
        return (0.0, 0.0);
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let support = sorted[(n * 0.1) as usize];
    let resistance = sorted[(n * 0.9) as usize];

    (support, resistance)
}

/// Classify volume against a baseline of 0.8x the current reading.
///
/// The baseline is intentionally self-referential: any positive volume
/// clears the high threshold, zero volume reads as normal. Short history
/// also reads as normal.
fn volume_trend(prices: &[f64], volume: f64) -> VolumeTrend {
    if prices.len() < 5 {
        return VolumeTrend::Normal;
    }

    let baseline = volume * 0.8;
    if volume > baseline * 1.2 {
        VolumeTrend::High
    } else if volume < baseline * 0.8 {
        VolumeTrend::Low
    } else {
        VolumeTrend::Normal
    }
}

/// Score sentiment from 24h change, volume and volatility magnitudes.
fn sentiment(change_24h: f64, volume: f64, volatility: f64) -> Sentiment {
    let mut score = 0i32;

    if change_24h > 2.0 {
        score += 2;
    } else if change_24h > 0.0 {
        score += 1;
    } else if change_24h < -2.0 {
        score -= 2;
    } else if change_24h < 0.0 {
        score -= 1;
    }

    if volume > 1_000_000_000.0 {
        score += 1;
    } else if volume < 100_000_000.0 {
        score -= 1;
    }

    if volatility > 5.0 {
        score += 1;
    } else if volatility < 1.0 {
        score -= 1;
    }

    if score > 2 {
        Sentiment::VeryBullish
    } else if score > 0 {
        Sentiment::Bullish
    } else if score < -2 {
        Sentiment::VeryBearish
    } else if score < 0 {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    }
}

/// Accumulate buy/sell scores over every signal condition and decide.
///
/// Conditions are independent, not mutually exclusive. A side must reach
/// `DECISION_THRESHOLD` and lead by more than `DECISION_MARGIN` to win;
/// everything else is HOLD.
fn score_signal(
    price: f64,
    trend: Trend,
    momentum: f64,
    volume_trend: VolumeTrend,
    sentiment: Sentiment,
    indicators: &IndicatorSet,
) -> TradeSignal {
    let mut buy_score = 0u32;
    let mut sell_score = 0u32;

    match trend {
        Trend::Bullish => buy_score += 2,
        Trend::Bearish => sell_score += 2,
        Trend::Neutral => {}
    }

    if let (Some(sma20), Some(sma50)) = (indicators.sma20, indicators.sma50) {
        if price > sma20 && sma20 > sma50 {
            buy_score += 2;
        } else if price < sma20 && sma20 < sma50 {
            sell_score += 2;
        }
    }

    if let Some(rsi) = indicators.rsi {
        if rsi < 30.0 {
            buy_score += 2; // oversold
        } else if rsi > 70.0 {
            sell_score += 2; // overbought
        } else if rsi > 50.0 {
            buy_score += 1;
        } else if rsi < 50.0 {
            sell_score += 1;
        }
    }

    if let Some(macd) = indicators.macd {
        if macd.macd > macd.signal && macd.macd > 0.0 {
            buy_score += 2;
        } else if macd.macd < macd.signal && macd.macd < 0.0 {
            sell_score += 2;
        }
    }

    if let Some(bollinger) = indicators.bollinger {
        if price < bollinger.lower {
            buy_score += 1;
        } else if price > bollinger.upper {
            sell_score += 1;
        }
    }

    if let Some(stochastic) = indicators.stochastic {
        if stochastic < 20.0 {
            buy_score += 1;
        } else if stochastic > 80.0 {
            sell_score += 1;
        }
    }

    // Volume confirms whichever side already leads.
    if volume_trend == VolumeTrend::High {
        if buy_score > sell_score {
            buy_score += 1;
        } else if sell_score > buy_score {
            sell_score += 1;
        }
    }

    if momentum > 2.0 {
        buy_score += 1;
    } else if momentum < -2.0 {
        sell_score += 1;
    }

    match sentiment {
        Sentiment::VeryBullish => buy_score += 2,
        Sentiment::Bullish => buy_score += 1,
        Sentiment::VeryBearish => sell_score += 2,
        Sentiment::Bearish => sell_score += 1,
        Sentiment::Neutral => {}
    }

    if buy_score >= DECISION_THRESHOLD && buy_score > sell_score + DECISION_MARGIN {
        TradeSignal::Buy
    } else if sell_score >= DECISION_THRESHOLD && sell_score > buy_score + DECISION_MARGIN {
        TradeSignal::Sell
    } else {
        TradeSignal::Hold
    }
}

/// Confidence for a decision: base 50 plus a bonus for every aligned
/// confirmation, clamped to [30, 95].
fn confidence(
    signal: TradeSignal,
    trend: Trend,
    momentum: f64,
    volume_trend: VolumeTrend,
    indicators: &IndicatorSet,
) -> f64 {
    let mut confidence: f64 = 50.0;

    let trend_aligned = (signal == TradeSignal::Buy && trend == Trend::Bullish)
        || (signal == TradeSignal::Sell && trend == Trend::Bearish);
    if trend_aligned {
        confidence += 20.0;
    }

    let momentum_aligned = (signal == TradeSignal::Buy && momentum > 1.0)
        || (signal == TradeSignal::Sell && momentum < -1.0);
    if momentum_aligned {
        confidence += 15.0;
    }

    if let Some(rsi) = indicators.rsi {
        if (signal == TradeSignal::Buy && rsi < 40.0)
            || (signal == TradeSignal::Sell && rsi > 60.0)
        {
            confidence += 10.0;
        }
    }

    if let Some(macd) = indicators.macd {
        if (signal == TradeSignal::Buy && macd.macd > macd.signal)
            || (signal == TradeSignal::Sell && macd.macd < macd.signal)
        {
            confidence += 10.0;
        }
    }

    if volume_trend == VolumeTrend::High {
        confidence += 10.0;
    }

    if momentum.abs() > 3.0 {
        confidence += 5.0;
    }

    confidence.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
}

/// Entry/exit levels plus the formatted risk/reward ratio.
#[derive(Debug, Clone, PartialEq)]
struct TradeLevels {
    entry: Option<f64>,
    exit: Option<f64>,
    stop_loss: f64,
    take_profit: f64,
    risk_reward: String,
}

/// Anchor entry, stop-loss and take-profit to technical levels.
///
/// Each level walks a priority chain: the short SMA first, then the relevant
/// Bollinger band, then a fixed percentage of the current price. HOLD
/// carries no entry and only a tight symmetric 2% band.
fn trade_levels(
    price: f64,
    signal: TradeSignal,
    support: f64,
    resistance: f64,
    indicators: &IndicatorSet,
) -> TradeLevels {
    let mut entry = None;
    let exit = None;
    let mut stop_loss = price * 0.95;
    let mut take_profit = price * 1.10;

    // Substitute percentile levels when the window was too short to
    // compute them.
    let valid_support = if support > 0.0 { support } else { price * 0.9 };
    let valid_resistance = if resistance > 0.0 {
        resistance
    } else {
        price * 1.1
    };

    match signal {
        TradeSignal::Buy => {
            // Entry on a pullback toward the short SMA or the lower band.
            entry = Some(if let Some(sma20) = indicators.sma20.filter(|s| price > *s) {
                sma20 * 1.001
            } else if let Some(b) = indicators.bollinger.filter(|b| price > b.lower) {
                b.lower * 1.002
            } else {
                price * 0.998
            });

            take_profit = if let Some(b) = indicators.bollinger.filter(|b| b.upper > price) {
                b.upper * 0.998
            } else if valid_resistance > price {
                valid_resistance * 0.998
            } else {
                price * 1.08
            };

            stop_loss = if let Some(sma20) = indicators.sma20.filter(|s| *s < price) {
                sma20 * 0.995
            } else if let Some(b) = indicators.bollinger.filter(|b| b.lower < price) {
                b.lower * 0.995
            } else {
                (valid_support * 0.98).max(price * 0.92)
            };
        }
        TradeSignal::Sell => {
            // Entry on a rally toward the short SMA or the upper band.
            entry = Some(if let Some(sma20) = indicators.sma20.filter(|s| price < *s) {
                sma20 * 0.999
            } else if let Some(b) = indicators.bollinger.filter(|b| price < b.upper) {
                b.upper * 0.998
            } else {
                price * 1.002
            });

            take_profit = if let Some(b) = indicators.bollinger.filter(|b| b.lower < price) {
                b.lower * 1.002
            } else if valid_support < price {
                valid_support * 1.002
            } else {
                price * 0.92
            };

            stop_loss = if let Some(sma20) = indicators.sma20.filter(|s| *s > price) {
                sma20 * 1.005
            } else if let Some(b) = indicators.bollinger.filter(|b| b.upper > price) {
                b.upper * 1.005
            } else {
                (valid_resistance * 1.02).min(price * 1.08)
            };
        }
        TradeSignal::Hold => {
            stop_loss = price * 0.98;
            take_profit = price * 1.02;
        }
    }

    let risk = (price - stop_loss).abs();
    let reward = (take_profit - price).abs();
    let risk_reward = if risk > 0.0 {
        format!("{:.2}", reward / risk)
    } else {
        "1.00".to_string()
    };

    TradeLevels {
        entry,
        exit,
        stop_loss,
        take_profit,
        risk_reward,
    }
}

/// Deterministic multi-line rationale for a decision.
fn analysis_text(
    symbol: &str,
    signal: TradeSignal,
    trend: Trend,
    momentum: f64,
    support: f64,
    resistance: f64,
) -> String {
    let mut lines = Vec::new();
    let trend_label = trend.label().to_uppercase();

    match signal {
        TradeSignal::Buy => {
            lines.push(format!(
                "STRONG BUY SIGNAL: {} shows bullish momentum with technical confirmation",
                symbol
            ));
            lines.push(format!(
                "Trend: {} - price action indicates upward movement",
                trend_label
            ));
            lines.push(format!(
                "Momentum: {:.2}% - strong buying pressure detected",
                momentum
            ));
        }
        TradeSignal::Sell => {
            lines.push(format!(
                "STRONG SELL SIGNAL: {} shows bearish momentum with technical confirmation",
                symbol
            ));
            lines.push(format!(
                "Trend: {} - price action indicates downward movement",
                trend_label
            ));
            lines.push(format!(
                "Momentum: {:.2}% - strong selling pressure detected",
                momentum
            ));
        }
        TradeSignal::Hold => {
            lines.push(format!("HOLD SIGNAL: {} in consolidation phase", symbol));
            lines.push(format!(
                "Trend: {} - waiting for clear direction",
                trend_label
            ));
            lines.push(format!("Momentum: {:.2}% - neutral momentum", momentum));
        }
    }

    if support > 0.0 && resistance > 0.0 {
        lines.push(format!(
            "Support: ${:.2} | Resistance: ${:.2}",
            support, resistance
        ));
    }

    match signal {
        TradeSignal::Buy => {
            lines.push("Strategy: look for entry on pullbacks to support levels".to_string());
            lines.push(
                "Risk management: set stop loss below support, target resistance levels"
                    .to_string(),
            );
        }
        TradeSignal::Sell => {
            lines.push("Strategy: look for entry on rallies to resistance levels".to_string());
            lines.push(
                "Risk management: set stop loss above resistance, target support levels"
                    .to_string(),
            );
        }
        TradeSignal::Hold => {
            lines.push(
                "Strategy: wait for breakout above resistance or breakdown below support"
                    .to_string(),
            );
            lines.push("Risk management: monitor volume for confirmation of direction".to_string());
        }
    }

    lines.join("\n")
}

/// Stringify the indicator values for the decision payload.
fn readout(
    volatility: f64,
    momentum: f64,
    support: f64,
    resistance: f64,
    indicators: &IndicatorSet,
) -> IndicatorReadout {
    fn fmt2(value: Option<f64>) -> String {
        value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}", v))
    }

    IndicatorReadout {
        volatility: format!("{:.2}", volatility),
        momentum: format!("{:.2}", momentum),
        support: format!("{:.2}", support),
        resistance: format!("{:.2}", resistance),
        sma20: fmt2(indicators.sma20),
        sma50: fmt2(indicators.sma50),
        rsi: fmt2(indicators.rsi),
        macd: indicators
            .macd
            .map_or_else(|| "N/A".to_string(), |m| format!("{:.4}", m.macd)),
        bollinger_upper: fmt2(indicators.bollinger.map(|b| b.upper)),
        bollinger_lower: fmt2(indicators.bollinger.map(|b| b.lower)),
        stochastic: fmt2(indicators.stochastic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetClass, PriceHistory};

    fn snapshot_with_prices(prices: &[f64], price: f64, change: f64, volume: f64) -> MarketSnapshot {
        // `prices` is newest first; record oldest first so the history ends
        // up in the same order.
        let mut history = PriceHistory::new();
        for (i, p) in prices.iter().rev().enumerate() {
            history.record(*p, i as i64 * 1_000);
        }

        MarketSnapshot {
            symbol: "TEST".to_string(),
            asset_type: AssetClass::Crypto,
            price,
            change_24h: change,
            volume,
            price_history: history,
        }
    }

    fn rising_prices(len: usize, from: f64, to: f64) -> Vec<f64> {
        // Newest first: index 0 carries `to`.
        let step = (to - from) / (len - 1) as f64;
        (0..len).map(|i| to - i as f64 * step).collect()
    }

    // =========================================================================
    // Derived metric tests
    // =========================================================================

    #[test]
    fn test_volatility_short_history_is_zero() {
        assert_eq!(volatility(&[]), 0.0);
        assert_eq!(volatility(&[100.0]), 0.0);
    }

    #[test]
    fn test_volatility_constant_series_is_zero() {
        let prices = vec![100.0; 50];
        assert_eq!(volatility(&prices), 0.0);
    }

    #[test]
    fn test_volatility_positive_for_moving_series() {
        let prices = vec![100.0, 110.0, 100.0, 90.0, 100.0];
        assert!(volatility(&prices) > 0.0);
    }

    #[test]
    fn test_trend_short_history_is_neutral() {
        assert_eq!(determine_trend(&[100.0; 4]), Trend::Neutral);
    }

    #[test]
    fn test_trend_five_points_has_empty_older_group() {
        assert_eq!(determine_trend(&[100.0; 5]), Trend::Neutral);
    }

    #[test]
    fn test_trend_bullish_on_rising_series() {
        let prices = rising_prices(50, 40_000.0, 45_000.0);
        assert_eq!(determine_trend(&prices), Trend::Bullish);
    }

    #[test]
    fn test_trend_bearish_on_falling_series() {
        let mut prices = rising_prices(50, 40_000.0, 45_000.0);
        prices.reverse();
        assert_eq!(determine_trend(&prices), Trend::Bearish);
    }

    #[test]
    fn test_trend_neutral_within_band() {
        // Less than 2% between the group means.
        let mut prices = vec![101.0; 5];
        prices.extend(vec![100.0; 5]);
        assert_eq!(determine_trend(&prices), Trend::Neutral);
    }

    #[test]
    fn test_momentum_short_history_is_zero() {
        assert_eq!(momentum(&[100.0; 9]), 0.0);
    }

    #[test]
    fn test_momentum_positive_on_rising_series() {
        let prices = rising_prices(50, 40_000.0, 45_000.0);
        assert!(momentum(&prices) > 0.0);
    }

    #[test]
    fn test_momentum_magnitude() {
        // Recent group averages 110, older group 100: +10%.
        let mut prices = vec![110.0; 5];
        prices.extend(vec![100.0; 5]);
        let m = momentum(&prices);
        assert!((m - 10.0).abs() < 1e-9, "expected 10%, got {}", m);
    }

    #[test]
    fn test_support_resistance_short_history_is_zero() {
        assert_eq!(support_resistance(&[100.0; 9]), (0.0, 0.0));
    }

    #[test]
    fn test_support_resistance_percentiles() {
        let prices: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let (support, resistance) = support_resistance(&prices);
        // Sorted ascending 1..=10: index 1 and index 9.
        assert_eq!(support, 2.0);
        assert_eq!(resistance, 10.0);
    }

    #[test]
    fn test_support_below_resistance() {
        let prices: Vec<f64> = (0..100).map(|i| 100.0 + ((i * 31) % 17) as f64).collect();
        let (support, resistance) = support_resistance(&prices);
        assert!(support <= resistance);
    }

    #[test]
    fn test_volume_trend_short_history_is_normal() {
        assert_eq!(volume_trend(&[100.0; 4], 1e9), VolumeTrend::Normal);
    }

    #[test]
    fn test_volume_trend_positive_volume_reads_high() {
        // The self-referential baseline makes any positive volume "high".
        assert_eq!(volume_trend(&[100.0; 10], 1.0), VolumeTrend::High);
        assert_eq!(volume_trend(&[100.0; 10], 5e9), VolumeTrend::High);
    }

    #[test]
    fn test_volume_trend_zero_volume_reads_normal() {
        assert_eq!(volume_trend(&[100.0; 10], 0.0), VolumeTrend::Normal);
    }

    #[test]
    fn test_sentiment_strong_rally() {
        // change +2, volume +1, quiet volatility -1 => bullish.
        assert_eq!(sentiment(3.2, 2e9, 0.1), Sentiment::Bullish);
    }

    #[test]
    fn test_sentiment_very_bullish_needs_all_three() {
        assert_eq!(sentiment(3.2, 2e9, 6.0), Sentiment::VeryBullish);
    }

    #[test]
    fn test_sentiment_sell_off() {
        assert_eq!(sentiment(-4.0, 5e7, 0.5), Sentiment::VeryBearish);
    }

    #[test]
    fn test_sentiment_flat_market() {
        // change 0, mid volume, mid volatility.
        assert_eq!(sentiment(0.0, 5e8, 2.0), Sentiment::Neutral);
    }

    // =========================================================================
    // Scoring and confidence tests
    // =========================================================================

    #[test]
    fn test_score_signal_empty_indicators_holds() {
        let indicators = IndicatorSet::default();
        let signal = score_signal(
            100.0,
            Trend::Neutral,
            0.0,
            VolumeTrend::Normal,
            Sentiment::Neutral,
            &indicators,
        );
        assert_eq!(signal, TradeSignal::Hold);
    }

    #[test]
    fn test_score_signal_requires_margin_over_opposition() {
        // Buy reaches the threshold but the margin over sell is too thin.
        let indicators = IndicatorSet::default();
        let signal = score_signal(
            100.0,
            Trend::Bullish,              // buy +2
            3.0,                         // buy +1
            VolumeTrend::Normal,
            Sentiment::VeryBullish,      // buy +2; total buy 5 < 6
            &indicators,
        );
        assert_eq!(signal, TradeSignal::Hold);
    }

    #[test]
    fn test_score_signal_buy_with_full_alignment() {
        let prices = rising_prices(50, 40_000.0, 45_000.0);
        let indicators = IndicatorSet::compute(&prices);
        let signal = score_signal(
            45_000.0,
            Trend::Bullish,
            3.0,
            VolumeTrend::High,
            Sentiment::VeryBullish,
            &indicators,
        );
        assert_eq!(signal, TradeSignal::Buy);
    }

    #[test]
    fn test_score_signal_sell_with_full_alignment() {
        let mut prices = rising_prices(50, 40_000.0, 45_000.0);
        prices.reverse(); // falling market, newest first
        let indicators = IndicatorSet::compute(&prices);
        let signal = score_signal(
            40_000.0,
            Trend::Bearish,
            -3.0,
            VolumeTrend::High,
            Sentiment::VeryBearish,
            &indicators,
        );
        assert_eq!(signal, TradeSignal::Sell);
    }

    #[test]
    fn test_confidence_clamped_floor() {
        let indicators = IndicatorSet::default();
        let c = confidence(
            TradeSignal::Hold,
            Trend::Neutral,
            0.0,
            VolumeTrend::Normal,
            &indicators,
        );
        assert_eq!(c, 50.0);
    }

    #[test]
    fn test_confidence_clamped_ceiling() {
        // Every confirmation aligned: 50+20+15+10+10+10+5 exceeds the cap.
        let prices = rising_prices(50, 40_000.0, 45_000.0);
        let indicators = IndicatorSet::compute(&prices);
        let c = confidence(
            TradeSignal::Buy,
            Trend::Bullish,
            4.0,
            VolumeTrend::High,
            &indicators,
        );
        assert_eq!(c, 95.0);
    }

    #[test]
    fn test_confidence_always_within_bounds() {
        let price_sets: Vec<Vec<f64>> = vec![
            vec![],
            vec![100.0; 5],
            rising_prices(50, 100.0, 200.0),
            {
                let mut v = rising_prices(50, 100.0, 200.0);
                v.reverse();
                v
            },
        ];
        for prices in &price_sets {
            let indicators = IndicatorSet::compute(prices);
            for signal in [TradeSignal::Buy, TradeSignal::Sell, TradeSignal::Hold] {
                for trend in [Trend::Bullish, Trend::Bearish, Trend::Neutral] {
                    for m in [-5.0, -1.5, 0.0, 1.5, 5.0] {
                        for vt in [VolumeTrend::Low, VolumeTrend::Normal, VolumeTrend::High] {
                            let c = confidence(signal, trend, m, vt, &indicators);
                            assert!((30.0..=95.0).contains(&c), "confidence {} out of range", c);
                        }
                    }
                }
            }
        }
    }

    // =========================================================================
    // Level tests
    // =========================================================================

    #[test]
    fn test_levels_hold_uses_tight_band() {
        let indicators = IndicatorSet::default();
        let levels = trade_levels(100.0, TradeSignal::Hold, 0.0, 0.0, &indicators);
        assert_eq!(levels.entry, None);
        assert_eq!(levels.exit, None);
        assert!((levels.stop_loss - 98.0).abs() < 1e-9);
        assert!((levels.take_profit - 102.0).abs() < 1e-9);
        assert_eq!(levels.risk_reward, "1.00");
    }

    #[test]
    fn test_levels_buy_without_indicators_uses_price_fallbacks() {
        let indicators = IndicatorSet::default();
        let levels = trade_levels(100.0, TradeSignal::Buy, 0.0, 0.0, &indicators);
        // Entry 0.2% below price; take-profit just under the substituted
        // resistance (price * 1.1); stop from the substituted support.
        assert!((levels.entry.unwrap() - 99.8).abs() < 1e-9);
        assert!((levels.take_profit - 110.0 * 0.998).abs() < 1e-9);
        assert!((levels.stop_loss - 92.0).abs() < 1e-9);
    }

    #[test]
    fn test_levels_buy_anchors_to_sma_when_price_above() {
        let indicators = IndicatorSet {
            sma20: Some(95.0),
            ..Default::default()
        };
        let levels = trade_levels(100.0, TradeSignal::Buy, 0.0, 0.0, &indicators);
        assert!((levels.entry.unwrap() - 95.0 * 1.001).abs() < 1e-9);
        assert!((levels.stop_loss - 95.0 * 0.995).abs() < 1e-9);
    }

    #[test]
    fn test_levels_sell_mirrors_buy() {
        let indicators = IndicatorSet {
            sma20: Some(105.0),
            ..Default::default()
        };
        let levels = trade_levels(100.0, TradeSignal::Sell, 90.0, 110.0, &indicators);
        assert!((levels.entry.unwrap() - 105.0 * 0.999).abs() < 1e-9);
        assert!((levels.stop_loss - 105.0 * 1.005).abs() < 1e-9);
        // Take-profit toward support.
        assert!((levels.take_profit - 90.0 * 1.002).abs() < 1e-9);
    }

    #[test]
    fn test_levels_risk_reward_formatting() {
        let indicators = IndicatorSet::default();
        let levels = trade_levels(100.0, TradeSignal::Hold, 0.0, 0.0, &indicators);
        // Symmetric 2% band: ratio exactly 1.
        assert_eq!(levels.risk_reward, "1.00");
    }

    // =========================================================================
    // Full decision tests
    // =========================================================================

    #[test]
    fn test_compute_signal_empty_history() {
        let snapshot = snapshot_with_prices(&[], 100.0, 0.0, 0.0);
        let decision = compute_signal("TEST", &snapshot);

        assert_eq!(decision.signal, TradeSignal::Hold);
        assert_eq!(decision.trend, Trend::Neutral);
        assert_eq!(decision.strength, 0.0);
        assert_eq!(decision.entry_price, None);
        assert_eq!(decision.exit_price, None);
        assert!((decision.stop_loss - 98.0).abs() < 1e-9);
        assert!((decision.take_profit - 102.0).abs() < 1e-9);
        assert_eq!(decision.risk_reward, "1.00");
        assert_eq!(decision.technical_indicators.sma20, "N/A");
        assert_eq!(decision.technical_indicators.rsi, "N/A");
        assert_eq!(decision.technical_indicators.stochastic, "N/A");
    }

    #[test]
    fn test_compute_signal_rising_market_never_sells() {
        let prices = rising_prices(50, 40_000.0, 45_000.0);
        let snapshot = snapshot_with_prices(&prices, 45_000.0, 3.2, 2e9);
        let decision = compute_signal("BTC", &snapshot);

        assert_eq!(decision.trend, Trend::Bullish);
        assert_ne!(decision.signal, TradeSignal::Sell);
        assert!(decision.confidence >= 50.0);
    }

    #[test]
    fn test_compute_signal_is_deterministic() {
        let prices = rising_prices(60, 100.0, 130.0);
        let snapshot = snapshot_with_prices(&prices, 130.0, 1.5, 5e8);

        let first = compute_signal("ETH", &snapshot);
        let second = compute_signal("ETH", &snapshot);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_compute_signal_strength_is_scaled_volatility() {
        let prices = vec![100.0, 130.0, 80.0, 140.0, 60.0, 150.0, 90.0, 120.0];
        let snapshot = snapshot_with_prices(&prices, 100.0, 0.0, 0.0);
        let decision = compute_signal("TEST", &snapshot);
        assert!(decision.strength <= 100.0);
        assert!(decision.strength > 0.0);
    }

    #[test]
    fn test_compute_signal_analysis_mentions_levels_when_available() {
        let prices = rising_prices(50, 40_000.0, 45_000.0);
        let snapshot = snapshot_with_prices(&prices, 45_000.0, 3.2, 2e9);
        let decision = compute_signal("BTC", &snapshot);
        assert!(decision.analysis.contains("Support: $"));
        assert!(decision.analysis.contains("Resistance: $"));
    }

    #[test]
    fn test_compute_signal_analysis_skips_levels_without_history() {
        let snapshot = snapshot_with_prices(&[], 100.0, 0.0, 0.0);
        let decision = compute_signal("TEST", &snapshot);
        assert!(!decision.analysis.contains("Support: $"));
        assert!(decision.analysis.contains("HOLD SIGNAL"));
    }
}

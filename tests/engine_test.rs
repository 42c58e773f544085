//! End-to-end properties of the signal engine over full candle windows.

use vigil::config::EngineConfig;
use vigil::services::engine::{cci_series, ema_series, synthetic_candles, SignalEngine};
use vigil::types::{Candle, CandleSeries, Classification};

fn candle(time: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle {
        time,
        open,
        high,
        low,
        close,
        volume: 1000.0,
    }
}

fn engine() -> SignalEngine {
    SignalEngine::new(EngineConfig::default())
}

/// A window ending in the exact BUY pattern: a long downtrend, a large
/// bullish crossover bar with wicks on both sides, then a clean
/// continuation bar with no lower wick, closing above the slow EMA with
/// positive momentum.
fn buy_pattern_series() -> Vec<Candle> {
    let mut bars = Vec::new();

    // Steady downtrend keeps the fast EMA below the slow one.
    for i in 0..37 {
        let base = 200.0 - i as f64;
        bars.push(candle(i as i64, base, base + 0.5, base - 1.5, base - 1.0));
    }

    // Crossover bar: a close far above both EMAs flips the fast EMA
    // over the slow one on this bar, and the huge range guarantees a
    // synthetic wick on both sides of the synthetic open.
    bars.push(candle(37, 163.0, 500.0, 100.0, 400.0));

    // Continuation bar: placed entirely above the synthetic open the
    // recurrence will assign it, so its synthetic candle has no lower
    // wick but keeps an upper one.
    let synth = synthetic_candles(&bars);
    let last = synth.last().unwrap();
    let next_open = (last.open + last.close) / 2.0;
    bars.push(candle(
        38,
        next_open + 10.0,
        next_open + 120.0,
        next_open + 5.0,
        next_open + 60.0,
    ));

    bars
}

/// Reflect every price around a pivot, swapping highs and lows.
fn mirrored(bars: &[Candle]) -> Vec<Candle> {
    let pivot = 200.0;
    bars.iter()
        .map(|c| Candle {
            time: c.time,
            open: 2.0 * pivot - c.open,
            high: 2.0 * pivot - c.low,
            low: 2.0 * pivot - c.high,
            close: 2.0 * pivot - c.close,
            volume: c.volume,
        })
        .collect()
}

#[test]
fn test_buy_pattern_series_satisfies_each_condition() {
    let bars = buy_pattern_series();
    let n = bars.len();
    let params = EngineConfig::default();

    let closes: Vec<f64> = bars.iter().map(|c| c.close).collect();
    let fast = ema_series(&closes, params.fast_window);
    let slow = ema_series(&closes, params.slow_window);
    assert!(fast[n - 3] < slow[n - 3], "fast EMA below slow before cross");
    assert!(fast[n - 2] > slow[n - 2], "fast EMA above slow at cross");

    let synth = synthetic_candles(&bars);
    let curr = synth[n - 2];
    assert!(curr.high > curr.open && curr.low < curr.open, "two-sided wick at cross bar");

    let next = synth[n - 1];
    assert!(next.low >= next.open, "no lower wick on continuation bar");
    assert!(next.high > next.open, "upper wick on continuation bar");
    assert!(next.close > slow[n - 1], "continuation closes above slow EMA");

    let cci = cci_series(&bars, params.cci_window);
    assert!(cci[n - 1].unwrap() > 0.0, "positive momentum at continuation");
}

#[test]
fn test_buy_pattern_series_classifies_buy() {
    let series = CandleSeries::new(buy_pattern_series()).unwrap();
    assert_eq!(engine().classify(&series), Classification::Buy);
}

#[test]
fn test_mirrored_buy_pattern_classifies_sell() {
    let series = CandleSeries::new(mirrored(&buy_pattern_series())).unwrap();
    assert_eq!(engine().classify(&series), Classification::Sell);
}

#[test]
fn test_missing_crossover_spike_classifies_none() {
    let mut bars = buy_pattern_series();
    // Replace the crossover bar with one more downtrend bar; the EMAs
    // never cross.
    bars[37] = candle(37, 163.0, 163.5, 161.5, 162.0);
    let series = CandleSeries::new(bars).unwrap();
    assert_eq!(engine().classify(&series), Classification::None);
}

#[test]
fn test_one_sided_wick_at_cross_bar_classifies_none() {
    let mut bars = buy_pattern_series();
    // Lift the crossover bar's low above the synthetic open so the
    // synthetic candle loses its lower wick.
    bars[37].low = 300.0;
    let series = CandleSeries::new(bars).unwrap();
    assert_eq!(engine().classify(&series), Classification::None);
}

#[test]
fn test_lower_wick_on_continuation_bar_classifies_none() {
    let mut bars = buy_pattern_series();
    // Drop the continuation bar's low far below its synthetic open.
    bars[38].low = 100.0;
    let series = CandleSeries::new(bars).unwrap();
    assert_eq!(engine().classify(&series), Classification::None);
}

#[test]
fn test_short_series_is_none_regardless_of_content() {
    let bars: Vec<Candle> = (0..4)
        .map(|i| candle(i, 100.0 + i as f64, 200.0, 50.0, 150.0))
        .collect();
    let series = CandleSeries::new(bars).unwrap();
    assert_eq!(engine().classify(&series), Classification::None);
}

#[test]
fn test_constant_price_series_converges_and_classifies_none() {
    let bars: Vec<Candle> = (0..60).map(|i| candle(i, 75.0, 75.0, 75.0, 75.0)).collect();

    let closes: Vec<f64> = bars.iter().map(|c| c.close).collect();
    for v in ema_series(&closes, 9) {
        assert!((v - 75.0).abs() < 1e-12);
    }
    for v in ema_series(&closes, 30) {
        assert!((v - 75.0).abs() < 1e-12);
    }
    assert_eq!(cci_series(&bars, 20).last().unwrap().unwrap(), 0.0);

    let series = CandleSeries::new(bars).unwrap();
    assert_eq!(engine().classify(&series), Classification::None);
}

#[test]
fn test_classify_is_idempotent() {
    let series = CandleSeries::new(buy_pattern_series()).unwrap();
    let engine = engine();
    let first = engine.classify(&series);
    let second = engine.classify(&series);
    assert_eq!(first, second);
    assert_eq!(first, Classification::Buy);
}

#[test]
fn test_synthetic_opens_differ_under_different_history() {
    // Identical last five candles, different history: the recursive
    // synthetic open must differ at the tail.
    let tail: Vec<Candle> = (40..45)
        .map(|i| candle(i, 100.0, 101.0, 99.0, 100.5))
        .collect();

    let mut from_uptrend: Vec<Candle> =
        (0..40).map(|i| candle(i, 50.0 + i as f64, 52.0 + i as f64, 49.0 + i as f64, 51.0 + i as f64)).collect();
    from_uptrend.extend(tail.clone());

    let mut from_downtrend: Vec<Candle> =
        (0..40).map(|i| candle(i, 150.0 - i as f64, 152.0 - i as f64, 149.0 - i as f64, 151.0 - i as f64)).collect();
    from_downtrend.extend(tail);

    let a = synthetic_candles(&from_uptrend);
    let b = synthetic_candles(&from_downtrend);
    assert_ne!(a.last().unwrap().open, b.last().unwrap().open);
}

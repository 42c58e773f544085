//! Signal engine: EMA crossover confirmed by a synthetic-candle pattern
//! and a CCI momentum filter.
//!
//! The engine is a pure function of its input window. It never fails on
//! a well-formed series; a window it cannot classify yields
//! [`Classification::None`].

pub mod cci;
pub mod ema;
pub mod heikin;

pub use cci::cci_series;
pub use ema::ema_series;
pub use heikin::{synthetic_candles, SyntheticCandle};

use crate::config::EngineConfig;
use crate::types::{CandleSeries, Classification};

/// A series shorter than this can never be classified.
pub const MIN_CLASSIFY_BARS: usize = 5;

/// Aligned indicator values at the three decision bars.
///
/// `prev` is index n-3, `curr` n-2, `next` n-1. The crossover is tested
/// at `curr`; the confirmation candle and momentum filter at `next`.
#[derive(Debug, Clone, Copy)]
struct PatternSnapshot {
    fast_prev: f64,
    slow_prev: f64,
    fast_curr: f64,
    slow_curr: f64,
    curr: SyntheticCandle,
    next: SyntheticCandle,
    slow_next: f64,
    cci_next: f64,
}

/// Crossover/pattern classifier over a validated candle window.
#[derive(Debug, Clone, Copy)]
pub struct SignalEngine {
    params: EngineConfig,
}

impl SignalEngine {
    pub fn new(params: EngineConfig) -> Self {
        Self { params }
    }

    /// Classify the window as BUY, SELL or NONE.
    ///
    /// Returns NONE for short windows (fewer than [`MIN_CLASSIFY_BARS`]
    /// candles) and while the slow EMA is still in its warm-up region;
    /// both are expected conditions, not errors.
    pub fn classify(&self, series: &CandleSeries) -> Classification {
        match self.snapshot(series) {
            Some(snapshot) => evaluate(&snapshot, self.params.wick_epsilon),
            None => Classification::None,
        }
    }

    /// Compute the aligned indicator values feeding the pattern rules.
    ///
    /// None when the window is too short for a stabilized decision.
    fn snapshot(&self, series: &CandleSeries) -> Option<PatternSnapshot> {
        let bars = series.candles();
        let n = bars.len();
        if n < MIN_CLASSIFY_BARS {
            return None;
        }
        // The crossover at n-2 needs the slow EMA out of warm-up at
        // n-3, so the window must cover the slow window plus the three
        // decision bars.
        if n < self.params.slow_window + 3 {
            return None;
        }

        let closes: Vec<f64> = bars.iter().map(|c| c.close).collect();
        let fast = ema_series(&closes, self.params.fast_window);
        let slow = ema_series(&closes, self.params.slow_window);
        let synth = synthetic_candles(bars);
        let cci = cci_series(bars, self.params.cci_window);

        Some(PatternSnapshot {
            fast_prev: fast[n - 3],
            slow_prev: slow[n - 3],
            fast_curr: fast[n - 2],
            slow_curr: slow[n - 2],
            curr: synth[n - 2],
            next: synth[n - 1],
            slow_next: slow[n - 1],
            cci_next: cci[n - 1]?,
        })
    }
}

/// Apply the pattern rules to one snapshot.
///
/// `eps` is the tolerance for the "no wick" equality tests: a wick
/// exists only when the synthetic high (or low) clears the synthetic
/// open by more than `eps`.
fn evaluate(s: &PatternSnapshot, eps: f64) -> Classification {
    // Crossover bar must print a wick on both sides of its open.
    let curr_two_sided = s.curr.high > s.curr.open + eps && s.curr.low < s.curr.open - eps;

    let bearish_cross = s.fast_prev > s.slow_prev && s.fast_curr < s.slow_curr;
    let next_no_upper_wick = s.next.high <= s.next.open + eps && s.next.low < s.next.open - eps;
    if bearish_cross
        && curr_two_sided
        && next_no_upper_wick
        && s.next.close < s.slow_next
        && s.cci_next < 0.0
    {
        return Classification::Sell;
    }

    let bullish_cross = s.fast_prev < s.slow_prev && s.fast_curr > s.slow_curr;
    let next_no_lower_wick = s.next.low >= s.next.open - eps && s.next.high > s.next.open + eps;
    if bullish_cross
        && curr_two_sided
        && next_no_lower_wick
        && s.next.close > s.slow_next
        && s.cci_next > 0.0
    {
        return Classification::Buy;
    }

    Classification::None
}

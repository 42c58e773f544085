//! Heikin-Ashi style synthetic candles.
//!
//! Each synthetic open averages the previous synthetic open and close,
//! so the whole sequence depends on the full history of the window and
//! must be computed in order from the first candle.

use crate::types::Candle;

/// Smoothed OHLC derived from one input candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticCandle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Derive one synthetic candle per input candle, oldest first.
pub fn synthetic_candles(candles: &[Candle]) -> Vec<SyntheticCandle> {
    let mut out: Vec<SyntheticCandle> = Vec::with_capacity(candles.len());

    for (i, c) in candles.iter().enumerate() {
        let close = (c.open + c.high + c.low + c.close) / 4.0;
        let open = if i == 0 {
            (c.open + c.close) / 2.0
        } else {
            let prev = &out[i - 1];
            (prev.open + prev.close) / 2.0
        };
        out.push(SyntheticCandle {
            open,
            high: c.high.max(open).max(close),
            low: c.low.min(open).min(close),
            close,
        });
    }

    out
}

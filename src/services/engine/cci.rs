//! Commodity Channel Index over a rolling window.

use crate::types::Candle;

/// Lam's scaling constant; keeps typical CCI excursions near +/-100.
const CCI_SCALE: f64 = 0.015;

/// Typical price of one candle.
fn typical_price(candle: &Candle) -> f64 {
    (candle.high + candle.low + candle.close) / 3.0
}

/// Mean absolute deviation of `values` around `mean`.
fn mean_deviation(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).abs()).sum::<f64>() / values.len() as f64
}

/// Compute the CCI for every candle, aligned with the input.
///
/// `CCI = (TP - SMA(TP)) / (0.015 * mean deviation)` over the trailing
/// `window` candles. Entries before the window fills are `None`. A flat
/// window (zero deviation) yields `0.0` rather than a division blowup.
pub fn cci_series(candles: &[Candle], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; candles.len()];
    }

    let tps: Vec<f64> = candles.iter().map(typical_price).collect();
    let mut out = Vec::with_capacity(candles.len());

    for i in 0..candles.len() {
        if i + 1 < window {
            out.push(None);
            continue;
        }

        let slice = &tps[i + 1 - window..=i];
        let sma = slice.iter().sum::<f64>() / window as f64;
        let mean_dev = mean_deviation(slice, sma);

        let cci = if mean_dev != 0.0 {
            (tps[i] - sma) / (CCI_SCALE * mean_dev)
        } else {
            0.0
        };
        out.push(Some(cci));
    }

    out
}

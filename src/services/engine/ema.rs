//! Exponential moving average, aligned index-for-index with its input.

/// Compute an EMA of the given values with `alpha = 2 / (window + 1)`.
///
/// The output has the same length as the input and is seeded from the
/// first sample. The first `window` entries are an unstabilized warm-up
/// region; callers must not base crossover decisions on them.
pub fn ema_series(values: &[f64], window: usize) -> Vec<f64> {
    if values.is_empty() || window == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (window as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);

    for &value in &values[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        out.push(prev);
    }

    out
}

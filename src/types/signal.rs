use serde::{Deserialize, Serialize};

use crate::types::Interval;

/// Engine output for one candle window.
///
/// `None` is a legitimate "no signal" result and is distinct from a
/// failed fetch, which the pipeline reports as [`Verdict::Error`]
/// without ever invoking the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Buy,
    Sell,
    None,
}

/// Pipeline-level result for one (symbol, interval) pair.
///
/// Extends [`Classification`] with `Error`, used when the data source
/// could not supply a usable candle window for that pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Buy,
    Sell,
    None,
    Error,
}

impl From<Classification> for Verdict {
    fn from(c: Classification) -> Self {
        match c {
            Classification::Buy => Verdict::Buy,
            Classification::Sell => Verdict::Sell,
            Classification::None => Verdict::None,
        }
    }
}

impl Verdict {
    /// Display label for chat messages and the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Buy => "BUY",
            Verdict::Sell => "SELL",
            Verdict::None => "NONE",
            Verdict::Error => "ERROR",
        }
    }
}

/// One row of a scan: the verdict for a single watchlist pair.
///
/// `price` is the latest close when the fetch succeeded, or the last
/// price seen in a previous scan when it did not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSignal {
    pub symbol: String,
    pub interval: Interval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub verdict: Verdict,
    /// Unix timestamp (milliseconds) when the scan produced this row.
    pub timestamp: i64,
}

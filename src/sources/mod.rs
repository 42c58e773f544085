//! Market data sources.

pub mod binance;

pub use binance::BinanceClient;

use std::future::Future;
use thiserror::Error;

use crate::types::{Candle, Interval};

/// Failure to obtain a candle window from a source.
///
/// This is the sentinel the pipeline turns into an ERROR verdict; it is
/// deliberately distinct from a short-but-valid window, which the
/// engine treats as a legitimate NONE.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// A service able to return the most recent OHLCV candles for a pair.
pub trait MarketData: Send + Sync {
    /// Fetch the `limit` most recent candles for (symbol, interval),
    /// oldest first.
    fn recent_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Candle>, SourceError>> + Send;
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Candle interval supported by the watchlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    /// Parse from the exchange's interval string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "5m" => Some(Interval::FiveMinutes),
            "15m" => Some(Interval::FifteenMinutes),
            "30m" => Some(Interval::ThirtyMinutes),
            "1h" => Some(Interval::OneHour),
            "4h" => Some(Interval::FourHours),
            "1d" => Some(Interval::OneDay),
            _ => None,
        }
    }

    /// The exchange-facing interval string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
        }
    }

}

/// One OHLCV sample. `time` is the bar open time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Validation failure when building a [`CandleSeries`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("timestamps not strictly increasing at index {0}")]
    NonMonotonic(usize),

    #[error("non-finite price field at index {0}")]
    NonFinite(usize),
}

/// A validated window of candles, oldest first.
///
/// Construction guarantees strictly increasing timestamps and finite
/// price fields, so the signal engine never has to re-check either.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries(Vec<Candle>);

impl CandleSeries {
    /// Validate and wrap a candle window.
    pub fn new(candles: Vec<Candle>) -> Result<Self, SeriesError> {
        for (i, c) in candles.iter().enumerate() {
            let fields = [c.open, c.high, c.low, c.close, c.volume];
            if fields.iter().any(|v| !v.is_finite()) {
                return Err(SeriesError::NonFinite(i));
            }
            if i > 0 && c.time <= candles[i - 1].time {
                return Err(SeriesError::NonMonotonic(i));
            }
        }
        Ok(Self(candles))
    }

    pub fn candles(&self) -> &[Candle] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The newest candle, if any.
    pub fn last(&self) -> Option<&Candle> {
        self.0.last()
    }
}

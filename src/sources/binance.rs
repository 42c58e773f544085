use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::sources::{MarketData, SourceError};
use crate::types::{Candle, Interval};

const BINANCE_API_URL: &str = "https://api.binance.com/api/v3";
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Transient failures are retried this many times in total.
const MAX_ATTEMPTS: u32 = 3;
/// Exponential backoff between attempts: base doubles, capped.
const BACKOFF_BASE_SECS: u64 = 2;
const BACKOFF_CAP_SECS: u64 = 10;

/// Binance REST client for historical klines.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
}

impl BinanceClient {
    /// Create a new Binance client.
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("Vigil/1.0")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    async fn fetch_once(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        let url = format!("{}/klines", BINANCE_API_URL);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.to_uppercase().as_str()),
                ("interval", interval.as_str()),
                ("limit", limit.to_string().as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let rows: Vec<Value> = response.json().await?;
        parse_klines(&rows)
    }
}

impl Default for BinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketData for BinanceClient {
    async fn recent_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        let mut backoff = BACKOFF_BASE_SECS;
        let mut attempt = 1;

        loop {
            match self.fetch_once(symbol, interval, limit).await {
                Ok(candles) => {
                    debug!(
                        "Fetched {} candles for {}-{}",
                        candles.len(),
                        symbol,
                        interval.as_str()
                    );
                    return Ok(candles);
                }
                Err(e) if attempt < MAX_ATTEMPTS => {
                    warn!(
                        "Fetch {}-{} attempt {}/{} failed: {}",
                        symbol,
                        interval.as_str(),
                        attempt,
                        MAX_ATTEMPTS,
                        e
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(BACKOFF_CAP_SECS);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Parse a Binance klines payload into candles.
///
/// Each row is `[openTime, open, high, low, close, volume, ...]` with
/// the prices as decimal strings. Any unparseable field fails the whole
/// window; the pipeline reports that pair as ERROR rather than
/// classifying a partial series.
fn parse_klines(rows: &[Value]) -> Result<Vec<Candle>, SourceError> {
    if rows.is_empty() {
        return Err(SourceError::Malformed("empty klines response".to_string()));
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let fields = row
                .as_array()
                .filter(|f| f.len() >= 6)
                .ok_or_else(|| SourceError::Malformed(format!("kline row {} too short", i)))?;

            let time = fields[0]
                .as_i64()
                .ok_or_else(|| SourceError::Malformed(format!("bad open time in row {}", i)))?;

            let price = |idx: usize, name: &str| -> Result<f64, SourceError> {
                fields[idx]
                    .as_str()
                    .and_then(|s| s.parse::<f64>().ok())
                    .ok_or_else(|| {
                        SourceError::Malformed(format!("non-numeric {} in row {}", name, i))
                    })
            };

            Ok(Candle {
                time,
                open: price(1, "open")?,
                high: price(2, "high")?,
                low: price(3, "low")?,
                close: price(4, "close")?,
                volume: price(5, "volume")?,
            })
        })
        .collect()
}

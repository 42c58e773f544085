//! Fetch + classify fan-out over the watchlist.
//!
//! Every (symbol, interval) pair is fetched and classified
//! independently: a failure on one pair becomes an ERROR row for that
//! pair and never aborts the others. Output order follows the
//! configured watchlist, so repeated scans are directly comparable.

use dashmap::DashMap;
use futures_util::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::services::engine::SignalEngine;
use crate::sources::MarketData;
use crate::types::{CandleSeries, Interval, PairSignal, Verdict};

/// Scan coordinator owning the data source and the engine.
pub struct SignalPipeline<S> {
    source: S,
    engine: SignalEngine,
    symbols: Vec<String>,
    intervals: Vec<Interval>,
    candle_limit: usize,
    concurrency: usize,
    /// Last close seen per symbol, so ERROR rows can still show a price.
    last_prices: DashMap<String, f64>,
    /// Guards scheduled runs against overlapping themselves.
    run_guard: Mutex<()>,
}

impl<S: MarketData> SignalPipeline<S> {
    pub fn new(source: S, engine: SignalEngine, config: &Config) -> Self {
        Self {
            source,
            engine,
            symbols: config.symbols.clone(),
            intervals: config.intervals.clone(),
            candle_limit: config.candle_limit,
            concurrency: config.fetch_concurrency.max(1),
            last_prices: DashMap::new(),
            run_guard: Mutex::new(()),
        }
    }

    /// The (symbol, interval) pairs scanned each cycle, in output order.
    pub fn watchlist(&self) -> Vec<(String, Interval)> {
        self.symbols
            .iter()
            .flat_map(|s| self.intervals.iter().map(move |tf| (s.clone(), *tf)))
            .collect()
    }

    /// Fetch and classify the whole watchlist.
    ///
    /// Fetches run with bounded concurrency; results keep watchlist
    /// order regardless of completion order.
    pub async fn scan(&self) -> Vec<PairSignal> {
        stream::iter(self.watchlist())
            .map(|(symbol, interval)| self.classify_pair(symbol, interval))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Scan unless a scheduled scan is already in flight.
    ///
    /// The periodic job calls this instead of [`scan`](Self::scan) so a
    /// slow cycle is skipped rather than stacked.
    pub async fn scan_if_idle(&self) -> Option<Vec<PairSignal>> {
        match self.run_guard.try_lock() {
            Ok(_guard) => Some(self.scan().await),
            Err(_) => {
                warn!("Previous scheduled scan still running, skipping this cycle");
                None
            }
        }
    }

    async fn classify_pair(&self, symbol: String, interval: Interval) -> PairSignal {
        let timestamp = chrono::Utc::now().timestamp_millis();

        let candles = match self
            .source
            .recent_candles(&symbol, interval, self.candle_limit)
            .await
        {
            Ok(candles) => candles,
            Err(e) => {
                warn!("{}-{}: fetch failed: {}", symbol, interval.as_str(), e);
                return self.error_row(symbol, interval, timestamp);
            }
        };

        let series = match CandleSeries::new(candles) {
            Ok(series) => series,
            Err(e) => {
                warn!("{}-{}: invalid series: {}", symbol, interval.as_str(), e);
                return self.error_row(symbol, interval, timestamp);
            }
        };

        let price = series.last().map(|c| c.close);
        if let Some(p) = price {
            self.last_prices.insert(symbol.clone(), p);
        }

        let verdict = Verdict::from(self.engine.classify(&series));
        debug!(
            "{}-{}: {} @ {:?}",
            symbol,
            interval.as_str(),
            verdict.label(),
            price
        );

        PairSignal {
            symbol,
            interval,
            price,
            verdict,
            timestamp,
        }
    }

    fn error_row(&self, symbol: String, interval: Interval, timestamp: i64) -> PairSignal {
        let price = self.last_prices.get(&symbol).map(|p| *p);
        PairSignal {
            symbol,
            interval,
            price,
            verdict: Verdict::Error,
            timestamp,
        }
    }
}

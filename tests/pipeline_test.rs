//! Pipeline behavior with scripted data sources: per-pair failure
//! isolation, stable ordering, and the run guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use vigil::config::{Config, EngineConfig};
use vigil::services::{SignalEngine, SignalPipeline};
use vigil::sources::{MarketData, SourceError};
use vigil::types::{Candle, Interval, Verdict};

fn flat_candles(limit: usize, price: f64) -> Vec<Candle> {
    (0..limit)
        .map(|i| Candle {
            time: 1_000_000 + i as i64 * 60_000,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 10.0,
        })
        .collect()
}

fn test_config(symbols: &[&str]) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        telegram_bot_token: None,
        telegram_admin_id: None,
        database_path: ":memory:".to_string(),
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        intervals: vec![Interval::FiveMinutes],
        candle_limit: 50,
        scan_interval_secs: 300,
        fetch_concurrency: 4,
        engine: EngineConfig::default(),
    }
}

fn pipeline<S: MarketData>(source: S, config: &Config) -> SignalPipeline<S> {
    SignalPipeline::new(source, SignalEngine::new(config.engine), config)
}

/// Fails for `badusdt` the way a malformed payload would; serves a flat
/// window for everything else.
struct ScriptedSource;

impl MarketData for ScriptedSource {
    async fn recent_candles(
        &self,
        symbol: &str,
        _interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        if symbol == "badusdt" {
            return Err(SourceError::Malformed("non-numeric close".to_string()));
        }
        Ok(flat_candles(limit, 100.0))
    }
}

/// Succeeds until `fail` is set, then errors on every fetch.
struct FlakySource {
    fail: Arc<AtomicBool>,
}

impl MarketData for FlakySource {
    async fn recent_candles(
        &self,
        _symbol: &str,
        _interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SourceError::Malformed("empty klines response".to_string()));
        }
        Ok(flat_candles(limit, 250.0))
    }
}

/// Returns candles whose timestamps never advance.
struct BrokenClockSource;

impl MarketData for BrokenClockSource {
    async fn recent_candles(
        &self,
        _symbol: &str,
        _interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        let mut candles = flat_candles(limit, 100.0);
        for c in candles.iter_mut() {
            c.time = 42;
        }
        Ok(candles)
    }
}

#[tokio::test]
async fn test_failed_pair_does_not_abort_batch() {
    let config = test_config(&["btcusdt", "badusdt", "ethusdt"]);
    let pipeline = pipeline(ScriptedSource, &config);

    let signals = pipeline.scan().await;
    assert_eq!(signals.len(), 3);

    assert_eq!(signals[0].symbol, "btcusdt");
    assert_eq!(signals[0].verdict, Verdict::None);
    assert_eq!(signals[0].price, Some(100.0));

    assert_eq!(signals[1].symbol, "badusdt");
    assert_eq!(signals[1].verdict, Verdict::Error);
    assert_eq!(signals[1].price, None);

    assert_eq!(signals[2].symbol, "ethusdt");
    assert_eq!(signals[2].verdict, Verdict::None);
}

#[tokio::test]
async fn test_scan_order_follows_watchlist() {
    let config = test_config(&["ethusdt", "btcusdt"]);
    let pipeline = pipeline(ScriptedSource, &config);

    let signals = pipeline.scan().await;
    let symbols: Vec<&str> = signals.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["ethusdt", "btcusdt"]);
}

#[tokio::test]
async fn test_error_row_keeps_last_seen_price() {
    let config = test_config(&["btcusdt"]);
    let fail = Arc::new(AtomicBool::new(false));
    let pipeline = pipeline(FlakySource { fail: fail.clone() }, &config);

    let first = pipeline.scan().await;
    assert_eq!(first[0].verdict, Verdict::None);
    assert_eq!(first[0].price, Some(250.0));

    fail.store(true, Ordering::SeqCst);

    let second = pipeline.scan().await;
    assert_eq!(second[0].verdict, Verdict::Error);
    assert_eq!(second[0].price, Some(250.0));
}

#[tokio::test]
async fn test_error_row_without_history_has_no_price() {
    let config = test_config(&["btcusdt"]);
    let fail = Arc::new(AtomicBool::new(true));
    let pipeline = pipeline(FlakySource { fail }, &config);

    let signals = pipeline.scan().await;
    assert_eq!(signals[0].verdict, Verdict::Error);
    assert_eq!(signals[0].price, None);
}

#[tokio::test]
async fn test_invalid_timestamps_become_error_verdict() {
    let config = test_config(&["btcusdt"]);
    let pipeline = pipeline(BrokenClockSource, &config);

    let signals = pipeline.scan().await;
    assert_eq!(signals[0].verdict, Verdict::Error);
}

#[tokio::test]
async fn test_watchlist_is_symbol_major() {
    let mut config = test_config(&["btcusdt", "ethusdt"]);
    config.intervals = vec![Interval::FiveMinutes, Interval::OneHour];
    let pipeline = pipeline(ScriptedSource, &config);

    let pairs = pipeline.watchlist();
    assert_eq!(
        pairs,
        vec![
            ("btcusdt".to_string(), Interval::FiveMinutes),
            ("btcusdt".to_string(), Interval::OneHour),
            ("ethusdt".to_string(), Interval::FiveMinutes),
            ("ethusdt".to_string(), Interval::OneHour),
        ]
    );
}

#[tokio::test]
async fn test_scan_if_idle_runs_when_idle() {
    let config = test_config(&["btcusdt"]);
    let pipeline = pipeline(ScriptedSource, &config);

    let signals = pipeline.scan_if_idle().await;
    assert!(signals.is_some());
    assert_eq!(signals.unwrap().len(), 1);
}

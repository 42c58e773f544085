use std::env;

use crate::types::Interval;

/// Signal engine tuning parameters.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Fast EMA window (samples).
    pub fast_window: usize,
    /// Slow EMA window (samples).
    pub slow_window: usize,
    /// CCI lookback window (samples).
    pub cci_window: usize,
    /// Tolerance for the "no wick" equality tests on synthetic candles.
    ///
    /// The pattern rules compare synthetic highs/lows against the
    /// synthetic open for exact equality; under floating-point
    /// arithmetic that comparison needs a tolerance, so it is exposed
    /// here instead of being hard-coded.
    pub wick_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fast_window: 9,
            slow_window: 30,
            cci_window: 20,
            wick_epsilon: 1e-9,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Telegram bot token. The bot is disabled when absent.
    pub telegram_bot_token: Option<String>,
    /// Telegram user id of the admin who approves access requests.
    pub telegram_admin_id: Option<i64>,
    /// Path of the SQLite user database.
    pub database_path: String,
    /// Symbols scanned on every cycle (exchange pair names, lowercase).
    pub symbols: Vec<String>,
    /// Candle intervals scanned per symbol.
    pub intervals: Vec<Interval>,
    /// Candles requested per (symbol, interval) fetch.
    pub candle_limit: usize,
    /// Seconds between scheduled broadcast scans.
    pub scan_interval_secs: u64,
    /// Maximum concurrent candle fetches during a scan.
    pub fetch_concurrency: usize,
    /// Signal engine parameters.
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let symbols = env::var("WATCH_SYMBOLS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|sym| sym.trim().to_lowercase())
                    .filter(|sym| !sym.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                ["btcusdt", "ethusdt", "solusdt", "xrpusdt"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        let intervals = env::var("WATCH_INTERVALS")
            .ok()
            .map(|s| {
                s.split(',')
                    .filter_map(|tf| Interval::from_str(tf.trim()))
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                vec![
                    Interval::FiveMinutes,
                    Interval::FifteenMinutes,
                    Interval::ThirtyMinutes,
                    Interval::OneHour,
                ]
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok(),
            telegram_admin_id: env::var("TELEGRAM_ADMIN_ID")
                .ok()
                .and_then(|v| v.parse().ok()),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "vigil.db".to_string()),
            symbols,
            intervals,
            candle_limit: env::var("CANDLE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            scan_interval_secs: env::var("SCAN_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            fetch_concurrency: env::var("FETCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            engine: EngineConfig {
                fast_window: env::var("EMA_FAST_WINDOW")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(9),
                slow_window: env::var("EMA_SLOW_WINDOW")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
                cci_window: env::var("CCI_WINDOW")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(20),
                wick_epsilon: env::var("WICK_EPSILON")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1e-9),
            },
        }
    }
}

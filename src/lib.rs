//! Vigil - crypto candle watcher with a Telegram bot and a web dashboard.
//!
//! A periodic scan fetches recent OHLCV candles for a fixed watchlist,
//! classifies each (symbol, interval) pair as BUY / SELL / NONE through
//! an EMA-crossover + synthetic-candle engine, and broadcasts the
//! result to authorized Telegram users. The same pipeline backs an axum
//! dashboard that re-scans on every request.

pub mod api;
pub mod config;
pub mod services;
pub mod sources;
pub mod telegram;
pub mod types;

use std::sync::Arc;

use services::SignalPipeline;
use sources::BinanceClient;

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SignalPipeline<BinanceClient>>,
}

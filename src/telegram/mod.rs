//! Telegram Bot API integration: thin HTTP client plus the long-polling
//! command dispatcher.

pub mod client;
pub mod dispatcher;

pub use client::{TelegramClient, TelegramError};
pub use dispatcher::Dispatcher;

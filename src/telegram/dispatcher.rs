//! Long-polling command dispatcher for the Telegram bot.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::services::{Broadcaster, SignalPipeline, UserStore};
use crate::sources::MarketData;
use crate::telegram::client::{Message, TelegramClient};

const HELP_TEXT: &str = "🆘 Vigil bot help 🆘\n\n\
🔍 Available commands:\n\
/start - start the bot\n\
/help - show this help\n\
/signals - request a signal scan\n\
/addme - request access";

/// A recognized bot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Signals,
    AddMe,
    /// `/approve_<id>`; None when the id part is unparseable.
    Approve(Option<i64>),
}

/// Parse the leading command of a message, tolerating an `@botname`
/// suffix and trailing arguments.
pub fn parse_command(text: &str) -> Option<Command> {
    let first = text.split_whitespace().next()?;
    let first = first.split('@').next().unwrap_or(first);

    if let Some(id) = first.strip_prefix("/approve_") {
        return Some(Command::Approve(id.parse().ok()));
    }

    match first {
        "/start" => Some(Command::Start),
        "/help" => Some(Command::Help),
        "/signals" => Some(Command::Signals),
        "/addme" => Some(Command::AddMe),
        _ => None,
    }
}

/// Routes incoming chat commands to the store, pipeline and broadcaster.
///
/// Holds references to everything it needs; nothing here is a global.
pub struct Dispatcher<S> {
    telegram: Arc<TelegramClient>,
    store: Arc<UserStore>,
    pipeline: Arc<SignalPipeline<S>>,
    broadcaster: Arc<Broadcaster>,
    admin_id: Option<i64>,
}

impl<S: MarketData> Dispatcher<S> {
    pub fn new(
        telegram: Arc<TelegramClient>,
        store: Arc<UserStore>,
        pipeline: Arc<SignalPipeline<S>>,
        broadcaster: Arc<Broadcaster>,
        admin_id: Option<i64>,
    ) -> Self {
        Self {
            telegram,
            store,
            pipeline,
            broadcaster,
            admin_id,
        }
    }

    /// Poll for updates until the task is aborted.
    pub async fn run(self) {
        info!("Telegram dispatcher started");
        let mut offset = 0i64;

        loop {
            match self.telegram.get_updates(offset).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        if let Some(message) = update.message {
                            self.handle_message(&message).await;
                        }
                    }
                }
                Err(e) => {
                    warn!("getUpdates failed: {}", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    async fn handle_message(&self, message: &Message) {
        let Some(text) = message.text.as_deref() else {
            return;
        };
        let Some(command) = parse_command(text) else {
            return;
        };
        let Some(from) = message.from.as_ref() else {
            return;
        };
        let username = from.username.clone().unwrap_or_default();
        let chat_id = message.chat.id;

        match command {
            Command::Start => {
                if let Err(e) = self.store.register_or_ignore(from.id, &username) {
                    error!("Registration failed for {}: {}", from.id, e);
                }
                self.reply(chat_id, "🤖 Bot is active! Use /help to see the commands")
                    .await;
            }
            Command::Help => {
                self.reply(chat_id, HELP_TEXT).await;
            }
            Command::Signals => self.handle_signals(chat_id, from.id).await,
            Command::AddMe => self.handle_addme(chat_id, from.id, &username).await,
            Command::Approve(user_id) => self.handle_approve(chat_id, from.id, user_id).await,
        }
    }

    async fn handle_signals(&self, chat_id: i64, user_id: i64) {
        match self.store.is_authorized(user_id) {
            Ok(true) => {}
            Ok(false) => {
                self.reply(chat_id, "❌ You are not authorized! Use /addme to request access")
                    .await;
                return;
            }
            Err(e) => {
                error!("Authorization check failed for {}: {}", user_id, e);
                self.reply(chat_id, "❌ Something went wrong, please try again")
                    .await;
                return;
            }
        }

        self.reply(chat_id, "⏳ Collecting signals...").await;
        let signals = self.pipeline.scan().await;
        self.broadcaster.broadcast(&signals).await;
    }

    async fn handle_addme(&self, chat_id: i64, user_id: i64, username: &str) {
        if let Err(e) = self.store.register_or_ignore(user_id, username) {
            error!("Registration failed for {}: {}", user_id, e);
            self.reply(chat_id, "❌ Something went wrong, please try again")
                .await;
            return;
        }

        if let Some(admin_id) = self.admin_id {
            let note = format!(
                "#️⃣ New access request:\n\n\
                 👤 User: @{}\n\
                 🆔 Id: {}\n\n\
                 ✅ To approve:\n/approve_{}",
                username, user_id, user_id
            );
            if let Err(e) = self.telegram.send_message(admin_id, &note).await {
                warn!("Could not notify admin: {}", e);
            }
        }

        self.reply(chat_id, "✅ Request sent! The admin will review it shortly")
            .await;
    }

    async fn handle_approve(&self, chat_id: i64, sender_id: i64, user_id: Option<i64>) {
        // Only the admin may approve; everyone else is ignored silently.
        if self.admin_id != Some(sender_id) {
            return;
        }

        let Some(user_id) = user_id else {
            self.reply(chat_id, "❌ Invalid format, expected /approve_123456")
                .await;
            return;
        };

        match self.store.approve(user_id) {
            Ok(true) => {
                if let Err(e) = self
                    .telegram
                    .send_message(user_id, "🎉 Your request was approved! You can now use /signals")
                    .await
                {
                    warn!("Could not notify approved user {}: {}", user_id, e);
                }
                self.reply(chat_id, &format!("✅ User {} authorized!", user_id))
                    .await;
            }
            Ok(false) => {
                self.reply(
                    chat_id,
                    &format!("❌ User {} is unknown or already authorized", user_id),
                )
                .await;
            }
            Err(e) => {
                error!("Approval failed for {}: {}", user_id, e);
                self.reply(chat_id, "❌ Something went wrong, please try again")
                    .await;
            }
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.telegram.send_message(chat_id, text).await {
            warn!("Could not reply to chat {}: {}", chat_id, e);
        }
    }
}

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Long-poll wait passed to `getUpdates`.
pub const POLL_TIMEOUT_SECS: u64 = 30;

/// Telegram API failure.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),
}

/// Envelope every Bot API method returns.
#[derive(Debug, Deserialize)]
struct ApiReply<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// One incoming update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// An incoming chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

/// Minimal Telegram Bot API client.
///
/// Constructed once at startup and shared by reference; there is no
/// process-wide bot singleton.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    token: String,
}

impl TelegramClient {
    pub fn new(token: String) -> Self {
        // Client timeout must outlast the getUpdates long poll.
        let client = Client::builder()
            .user_agent("Vigil/1.0")
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 15))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, token }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", TELEGRAM_API_URL, self.token, method)
    }

    /// Send a plain-text message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let params = [("chat_id", chat_id.to_string()), ("text", text.to_string())];
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .form(&params)
            .send()
            .await?;

        let reply: ApiReply<serde_json::Value> = response.json().await?;
        if !reply.ok {
            return Err(TelegramError::Api(
                reply.description.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        debug!("Sent message to chat {}", chat_id);
        Ok(())
    }

    /// Long-poll for updates newer than `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", POLL_TIMEOUT_SECS.to_string()),
            ])
            .send()
            .await?;

        let reply: ApiReply<Vec<Update>> = response.json().await?;
        if !reply.ok {
            return Err(TelegramError::Api(
                reply.description.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(reply.result.unwrap_or_default())
    }
}

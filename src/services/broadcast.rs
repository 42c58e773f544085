//! Fan-out of scan results to authorized chat users.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::services::UserStore;
use crate::telegram::TelegramClient;
use crate::types::{PairSignal, Verdict};

/// Delivers scan reports to every authorized user.
///
/// Delivery is fire-and-forget per recipient: a blocked or deleted chat
/// is logged and skipped, never aborting the rest of the broadcast.
pub struct Broadcaster {
    telegram: Arc<TelegramClient>,
    store: Arc<UserStore>,
}

impl Broadcaster {
    pub fn new(telegram: Arc<TelegramClient>, store: Arc<UserStore>) -> Self {
        Self { telegram, store }
    }

    /// Send one formatted report to all authorized users.
    pub async fn broadcast(&self, signals: &[PairSignal]) {
        let users = match self.store.authorized_users() {
            Ok(users) => users,
            Err(e) => {
                error!("Cannot load authorized users: {}", e);
                return;
            }
        };
        if users.is_empty() {
            debug!("No authorized users, skipping broadcast");
            return;
        }

        let text = format_report(signals);
        let mut delivered = 0usize;
        for user in &users {
            match self.telegram.send_message(user.user_id, &text).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Could not deliver to user {}: {}", user.user_id, e),
            }
        }
        info!("Broadcast delivered to {}/{} users", delivered, users.len());
    }
}

/// Render a scan as a chat message, one line per watchlist pair.
pub fn format_report(signals: &[PairSignal]) -> String {
    let mut out = String::from("📊 Crypto signals:\n\n");
    for s in signals {
        let price = s
            .price
            .map(format_price)
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "{} ({}): {} {} | {}\n",
            s.symbol.to_uppercase(),
            s.interval.as_str(),
            verdict_emoji(s.verdict),
            s.verdict.label(),
            price
        ));
    }
    out
}

fn verdict_emoji(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Buy => "🟢",
        Verdict::Sell => "🔴",
        Verdict::None => "🟡",
        Verdict::Error => "⚠️",
    }
}

/// Format a price with precision suited to its magnitude.
fn format_price(price: f64) -> String {
    if price >= 100.0 {
        format!("{:.2}", price)
    } else if price >= 1.0 {
        format!("{:.4}", price)
    } else {
        format!("{:.6}", price)
    }
}

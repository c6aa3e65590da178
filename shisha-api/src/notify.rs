//! Telegram order notifications
//!
//! When a bot token and staff chat are configured, new ORDER actions are
//! forwarded to the lounge staff chat via the Bot API sendMessage call.
//! Delivery is fire-and-forget: a failed notification is logged and never
//! fails the order itself.

use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const TELEGRAM_BASE_URL: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Telegram sendMessage client for order notifications
pub struct OrderNotifier {
    http: reqwest::Client,
    bot_token: String,
    chat_id: i64,
}

impl OrderNotifier {
    pub fn new(bot_token: String, chat_id: i64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            http,
            bot_token,
            chat_id,
        }
    }

    /// Build a notifier from SHISHA_BOT_TOKEN / SHISHA_STAFF_CHAT, if both
    /// are set
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("SHISHA_BOT_TOKEN").ok()?;
        let chat_id: i64 = std::env::var("SHISHA_STAFF_CHAT").ok()?.parse().ok()?;

        if bot_token.is_empty() {
            return None;
        }
        Some(Self::new(bot_token, chat_id))
    }

    /// Send a new-order message to the staff chat
    pub async fn notify_order(&self, mix_name: &str, table_number: i64, comment: Option<&str>) {
        let mut text = format!("New order: mix \"{}\" for table {}", mix_name, table_number);
        if let Some(comment) = comment {
            text.push_str(&format!("\nComment: {}", comment));
        }

        let url = format!("{}/bot{}/sendMessage", TELEGRAM_BASE_URL, self.bot_token);
        let body = json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        match self.http.post(&url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Order notification delivered for mix \"{}\"", mix_name);
            }
            Ok(response) => {
                warn!(
                    "Order notification rejected by Telegram: HTTP {}",
                    response.status()
                );
            }
            Err(e) => {
                warn!("Order notification failed: {}", e);
            }
        }
    }
}

//! Telegram notifier: posts each lead to a fixed chat through the Bot API.
//!
//! Uses plain `sendMessage` over HTTPS instead of a bot framework: the
//! notifier only ever sends, and success is simply HTTP 200.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info, warn};

use leadpost_core::config::TelegramConfig;
use leadpost_core::types::{ChannelKind, Lead};
use leadpost_core::utils::truncate_string;

use crate::base::Notifier;
use crate::error::ChannelError;
use crate::formatting::telegram_html;

/// Bot API request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Sends lead notifications to one Telegram chat.
pub struct TelegramNotifier {
    client: reqwest::Client,
    config: TelegramConfig,
    timeout: Duration,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_base", &self.config.api_base)
            .field("chat_id", &self.config.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(client: reqwest::Client, config: TelegramConfig) -> Self {
        Self {
            client,
            config,
            timeout: REQUEST_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full `sendMessage` URL. Contains the bot token; never log it.
    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Telegram
    }

    async fn send(&self, lead: &Lead) -> Result<(), ChannelError> {
        let text = telegram_html(lead);
        let body = SendMessage {
            chat_id: &self.config.chat_id,
            text: &text,
            parse_mode: "HTML",
        };

        debug!(chat_id = %self.config.chat_id, lead_id = lead.id(), "sending telegram notification");

        let response = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            // reqwest errors carry the URL, which carries the token
            .map_err(|e| ChannelError::from(e.without_url()))?;

        let status = response.status();
        if status == StatusCode::OK {
            info!(chat_id = %self.config.chat_id, lead_id = lead.id(), "telegram notification sent");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            status = %status,
            body = %truncate_string(&body, 200),
            "telegram API returned error"
        );

        if body.trim().is_empty() {
            Err(ChannelError::Rejected(status.to_string()))
        } else {
            Err(ChannelError::Rejected(body))
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

//! Configuration schema.
//!
//! Hierarchy: `Config` → `NotifyConfig` (`MailConfig`, `SmsConfig`,
//! `TelegramConfig`), `GatewayConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

use crate::types::ChannelKind;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.leadpost/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub notify: NotifyConfig,
    pub gateway: GatewayConfig,
}

// ─────────────────────────────────────────────
// Notification channels
// ─────────────────────────────────────────────

/// Credentials for every notification channel.
///
/// A channel whose required fields are not all set is skipped by the
/// dispatcher, never reported as failed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotifyConfig {
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub sms: SmsConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl NotifyConfig {
    /// Whether the given channel has all its required credentials.
    pub fn is_configured(&self, kind: ChannelKind) -> bool {
        match kind {
            ChannelKind::Email => self.mail.is_configured(),
            ChannelKind::Sms => self.sms.is_configured(),
            ChannelKind::Telegram => self.telegram.is_configured(),
        }
    }

    /// Channels that would be attempted, in report order.
    pub fn configured_channels(&self) -> Vec<ChannelKind> {
        ChannelKind::ALL
            .into_iter()
            .filter(|k| self.is_configured(*k))
            .collect()
    }
}

/// SMTP relay settings for the email channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MailConfig {
    /// SMTP server hostname.
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// SMTP server port (default 587 for STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP login username.
    #[serde(default)]
    pub username: String,
    /// SMTP login password.
    #[serde(default)]
    pub password: String,
    /// Mailbox that receives every lead notification.
    #[serde(default)]
    pub recipient: String,
    /// Sender address; falls back to `username`.
    #[serde(default)]
    pub from_address: String,
    /// Use STARTTLS (default true).
    #[serde(default = "default_true")]
    pub use_tls: bool,
    /// Use implicit TLS/SMTPS (default false, for port 465).
    #[serde(default)]
    pub use_ssl: bool,
}

fn default_smtp_host() -> String { "smtp.mail.ru".to_string() }
fn default_smtp_port() -> u16 { 587 }
fn default_true() -> bool { true }

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: 587,
            username: String::new(),
            password: String::new(),
            recipient: String::new(),
            from_address: String::new(),
            use_tls: true,
            use_ssl: false,
        }
    }
}

impl MailConfig {
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty()
            && !self.username.is_empty()
            && !self.password.is_empty()
            && !self.recipient.is_empty()
    }

    /// The From address actually used.
    pub fn sender(&self) -> &str {
        if self.from_address.is_empty() {
            &self.username
        } else {
            &self.from_address
        }
    }
}

/// SMS gateway settings (sms.ru-compatible API).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsConfig {
    /// Gateway API key (`api_id`).
    #[serde(default)]
    pub api_key: String,
    /// Phone number that receives every lead notification.
    #[serde(default)]
    pub recipient_phone: String,
    /// Gateway base URL.
    #[serde(default = "default_sms_api_base")]
    pub api_base: String,
}

fn default_sms_api_base() -> String { "https://sms.ru".to_string() }

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            recipient_phone: String::new(),
            api_base: default_sms_api_base(),
        }
    }
}

impl SmsConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.recipient_phone.is_empty()
    }
}

/// Telegram Bot API settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    #[serde(default)]
    pub bot_token: String,
    /// Chat that receives every lead notification.
    #[serde(default)]
    pub chat_id: String,
    /// Bot API base URL.
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

fn default_telegram_api_base() -> String { "https://api.telegram.org".to_string() }

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: default_telegram_api_base(),
        }
    }
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// HTTP gateway configuration (the `send-notification` endpoint).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 18790,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

//! SMS notifier: one text per lead through an sms.ru-compatible gateway.
//!
//! `GET <api_base>/sms/send?api_id=..&to=..&msg=..&json=1`
//!
//! The gateway's own `status` field decides success: an HTTP 200 carrying
//! `"status": "ERROR"` is a failed delivery.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use leadpost_core::config::SmsConfig;
use leadpost_core::types::{ChannelKind, Lead};
use leadpost_core::utils::truncate_string;

use crate::base::Notifier;
use crate::error::ChannelError;
use crate::formatting::sms_text;

/// Gateway request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-level gateway reply (`json=1`).
#[derive(Debug, Deserialize)]
struct GatewayReply {
    #[serde(default)]
    status: String,
    #[serde(default)]
    status_text: Option<String>,
}

/// Sends lead notifications to a single fixed phone number.
pub struct SmsNotifier {
    client: reqwest::Client,
    config: SmsConfig,
    timeout: Duration,
}

impl SmsNotifier {
    pub fn new(client: reqwest::Client, config: SmsConfig) -> Self {
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

    fn send_url(&self) -> String {
        format!("{}/sms/send", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    async fn send(&self, lead: &Lead) -> Result<(), ChannelError> {
        let text = sms_text(lead);
        debug!(to = %self.config.recipient_phone, lead_id = lead.id(), "sending sms notification");

        let response = self
            .client
            .get(self.send_url())
            .query(&[
                ("api_id", self.config.api_key.as_str()),
                ("to", self.config.recipient_phone.as_str()),
                ("msg", text.as_str()),
                ("json", "1"),
            ])
            .timeout(self.timeout)
            .send()
            .await
            // the query string carries the api key
            .map_err(|e| ChannelError::from(e.without_url()))?;

        let http_status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChannelError::from(e.without_url()))?;

        let reply: GatewayReply = match serde_json::from_str(&body) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    status = %http_status,
                    body = %truncate_string(&body, 200),
                    "unreadable sms gateway reply"
                );
                return Err(ChannelError::Rejected(format!(
                    "unreadable gateway reply ({http_status}): {e}"
                )));
            }
        };

        if reply.status == "OK" {
            info!(to = %self.config.recipient_phone, lead_id = lead.id(), "sms notification sent");
            return Ok(());
        }

        let detail = reply
            .status_text
            .filter(|t| !t.is_empty())
            .or_else(|| Some(reply.status).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| http_status.to_string());
        warn!(status = %http_status, detail = %detail, "sms gateway rejected message");
        Err(ChannelError::Rejected(detail))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

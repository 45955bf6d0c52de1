//! Email notifier: one HTML message per lead via SMTP (`lettre`).
//!
//! Transport selection follows `MailConfig`:
//! - `use_ssl` → implicit TLS (SMTPS, usually port 465)
//! - `use_tls` → STARTTLS (usually port 587, the default)
//! - neither  → plain SMTP (local relays and tests only)

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use leadpost_core::config::MailConfig;
use leadpost_core::types::{ChannelKind, Lead};

use crate::base::Notifier;
use crate::error::ChannelError;
use crate::formatting::{email_html, email_subject};

/// SMTP command timeout.
const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

// ─────────────────────────────────────────────
// EmailNotifier
// ─────────────────────────────────────────────

/// Sends lead notifications to a single fixed mailbox.
pub struct EmailNotifier {
    config: MailConfig,
}

impl EmailNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Assemble the multipart message for a lead.
    fn build_message(&self, lead: &Lead) -> Result<Message, ChannelError> {
        let from: Mailbox = self.config.sender().parse()?;
        let to: Mailbox = self.config.recipient.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(email_subject(lead))
            .multipart(
                MultiPart::alternative().singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(email_html(lead)),
                ),
            )?;

        Ok(message)
    }

    /// Port actually dialled: the configured one, or 587 when unset.
    fn port(&self) -> u16 {
        if self.config.port > 0 {
            self.config.port
        } else {
            DEFAULT_SMTP_PORT
        }
    }

    /// Build the SMTP transport for the configured security mode.
    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, ChannelError> {

        let creds = Credentials::new(
            self.config.username.clone(),
            self.config.password.clone(),
        );

        let builder = if self.config.use_ssl {
            // Implicit TLS (SMTPS, port 465)
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
                .map_err(|e| ChannelError::Transport(format!("SMTP relay error: {e}")))?
        } else if self.config.use_tls {
            // STARTTLS (port 587)
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
                .map_err(|e| ChannelError::Transport(format!("SMTP STARTTLS error: {e}")))?
        } else {
            // Plain (no TLS)
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.host)
        };

        Ok(builder
            .port(self.port())
            .credentials(creds)
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn send(&self, lead: &Lead) -> Result<(), ChannelError> {
        let message = self.build_message(lead)?;
        let transport = self.build_transport()?;

        debug!(
            host = %self.config.host,
            port = self.port(),
            lead_id = lead.id(),
            "sending email notification"
        );

        transport.send(message).await?;

        info!(to = %self.config.recipient, lead_id = lead.id(), "email notification sent");
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

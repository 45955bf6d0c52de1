//! Core types for leadpost: the lead being announced and the report of
//! how the announcement went.
//!
//! `NotificationRequest` is the loose wire shape posted by the lead intake
//! form; `Lead` is the validated, immutable record the dispatcher works on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────
// Channels
// ─────────────────────────────────────────────

/// One outbound notification mechanism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Sms,
    Telegram,
}

impl ChannelKind {
    /// All channels, in report order.
    pub const ALL: [ChannelKind; 3] = [ChannelKind::Email, ChannelKind::Sms, ChannelKind::Telegram];

    /// Machine name, matching config keys (`"email"`, `"sms"`, `"telegram"`).
    pub fn name(&self) -> &'static str {
        match self {
            ChannelKind::Email => "email",
            ChannelKind::Sms => "sms",
            ChannelKind::Telegram => "telegram",
        }
    }

    /// Human label used as the prefix of report error strings.
    pub fn label(&self) -> &'static str {
        match self {
            ChannelKind::Email => "Email",
            ChannelKind::Sms => "SMS",
            ChannelKind::Telegram => "Telegram",
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────
// Lead
// ─────────────────────────────────────────────

/// A prospective customer's request for service.
///
/// Immutable once built: fields are private and only readable through
/// accessors, so `message` can never hold a blank string.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Lead {
    id: i64,
    name: String,
    phone: String,
    email: String,
    service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Lead {
    /// Create a lead without a message.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Lead {
            id,
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            service: service.into(),
            message: None,
        }
    }

    /// Attach a free-text message. Blank messages are dropped.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = if message.trim().is_empty() {
            None
        } else {
            Some(message)
        };
        self
    }

    /// Application identifier assigned by lead intake.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// The message, if the customer left one. Never `Some("")`.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Raised when a `NotificationRequest` lacks required fields.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("missing required fields: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<&'static str>);

/// Body of `POST /send-notification`.
///
/// Every field is optional on the wire; `into_lead` decides what is usable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationRequest {
    pub application_id: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub service: Option<String>,
    pub message: Option<String>,
}

impl NotificationRequest {
    /// Validate into a `Lead`.
    ///
    /// Empty strings and an `application_id` of 0 count as missing.
    pub fn into_lead(self) -> Result<Lead, MissingFields> {
        let mut missing = Vec::new();

        let id = match self.application_id {
            Some(id) if id != 0 => id,
            _ => {
                missing.push("application_id");
                0
            }
        };
        let mut take = |value: Option<String>, field: &'static str| match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                missing.push(field);
                String::new()
            }
        };
        let name = take(self.name, "name");
        let phone = take(self.phone, "phone");
        let email = take(self.email, "email");
        let service = take(self.service, "service");

        if !missing.is_empty() {
            return Err(MissingFields(missing));
        }

        let lead = Lead::new(id, name, phone, email, service);
        Ok(match self.message {
            Some(message) => lead.with_message(message),
            None => lead,
        })
    }
}

// ─────────────────────────────────────────────
// Delivery report
// ─────────────────────────────────────────────

/// Aggregated outcome of one dispatch.
///
/// A channel that was not configured is `false` and has no error entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub email_sent: bool,
    pub sms_sent: bool,
    pub telegram_sent: bool,
    /// One entry per failed attempt, prefixed with the channel label.
    pub errors: Vec<String>,
}

impl DeliveryReport {
    /// Record a successful delivery.
    pub fn mark_sent(&mut self, kind: ChannelKind) {
        match kind {
            ChannelKind::Email => self.email_sent = true,
            ChannelKind::Sms => self.sms_sent = true,
            ChannelKind::Telegram => self.telegram_sent = true,
        }
    }

    /// Record a failed attempt as `"<Label> error: <detail>"`.
    pub fn record_failure(&mut self, kind: ChannelKind, detail: impl std::fmt::Display) {
        self.errors.push(format!("{} error: {}", kind.label(), detail));
    }

    /// Whether the given channel delivered.
    pub fn sent(&self, kind: ChannelKind) -> bool {
        match kind {
            ChannelKind::Email => self.email_sent,
            ChannelKind::Sms => self.sms_sent,
            ChannelKind::Telegram => self.telegram_sent,
        }
    }

    /// Number of channels that delivered.
    pub fn sent_count(&self) -> usize {
        ChannelKind::ALL.iter().filter(|k| self.sent(**k)).count()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> NotificationRequest {
        NotificationRequest {
            application_id: Some(42),
            name: Some("A. Ivanov".into()),
            phone: Some("+79001234567".into()),
            email: Some("a@x.ru".into()),
            service: Some("Consultation".into()),
            message: None,
        }
    }

    #[test]
    fn test_channel_labels() {
        assert_eq!(ChannelKind::Email.label(), "Email");
        assert_eq!(ChannelKind::Sms.label(), "SMS");
        assert_eq!(ChannelKind::Telegram.label(), "Telegram");
        assert_eq!(ChannelKind::Sms.to_string(), "sms");
    }

    #[test]
    fn test_lead_blank_message_dropped() {
        let lead = Lead::new(1, "n", "p", "e", "s").with_message("   ");
        assert!(lead.message().is_none());

        let lead = Lead::new(1, "n", "p", "e", "s").with_message("call me");
        assert_eq!(lead.message(), Some("call me"));
    }

    #[test]
    fn test_lead_accessors_and_serialization() {
        let lead = Lead::new(7, "n", "+7900", "e@x.ru", "s");
        assert_eq!(
            (lead.id(), lead.name(), lead.phone(), lead.email(), lead.service()),
            (7, "n", "+7900", "e@x.ru", "s")
        );

        let json = serde_json::to_value(&lead).unwrap();
        assert!(json.get("message").is_none());
        let json = serde_json::to_value(lead.with_message("hi")).unwrap();
        assert_eq!(json["message"], "hi");
    }

    #[test]
    fn test_request_into_lead() {
        let mut req = full_request();
        req.message = Some("Evening please".into());
        let lead = req.into_lead().unwrap();
        assert_eq!(lead.id(), 42);
        assert_eq!(lead.name(), "A. Ivanov");
        assert_eq!(lead.message(), Some("Evening please"));
    }

    #[test]
    fn test_request_empty_message_is_none() {
        let mut req = full_request();
        req.message = Some(String::new());
        assert!(req.into_lead().unwrap().message().is_none());
    }

    #[test]
    fn test_request_missing_fields_listed() {
        let req = NotificationRequest {
            application_id: Some(0),
            name: Some(String::new()),
            ..full_request()
        };
        let err = req.into_lead().unwrap_err();
        assert_eq!(err.0, vec!["application_id", "name"]);
        assert_eq!(err.to_string(), "missing required fields: application_id, name");
    }

    #[test]
    fn test_request_from_json_partial() {
        let req: NotificationRequest =
            serde_json::from_str(r#"{"application_id": 7, "name": "Bob"}"#).unwrap();
        let err = req.into_lead().unwrap_err();
        assert_eq!(err.0, vec!["phone", "email", "service"]);
    }

    #[test]
    fn test_report_default_is_empty() {
        let report = DeliveryReport::default();
        assert_eq!(report.sent_count(), 0);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_report_records() {
        let mut report = DeliveryReport::default();
        report.mark_sent(ChannelKind::Telegram);
        report.record_failure(ChannelKind::Sms, "balance exhausted");

        assert!(report.telegram_sent);
        assert!(!report.sms_sent);
        assert_eq!(report.sent_count(), 1);
        assert_eq!(report.errors, vec!["SMS error: balance exhausted"]);
    }

    #[test]
    fn test_report_serializes_snake_case() {
        let json = serde_json::to_value(DeliveryReport::default()).unwrap();
        assert_eq!(json["email_sent"], false);
        assert_eq!(json["telegram_sent"], false);
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}

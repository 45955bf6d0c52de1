//! Dispatcher: fans one lead out to every configured notifier.
//!
//! Notifiers are registered once per dispatch (from the injected
//! `NotifyConfig`) or by hand in tests. `dispatch()` runs every attempt
//! concurrently, waits for all of them, and folds the outcomes into a
//! `DeliveryReport`. Channel failures never escape as errors.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use leadpost_core::config::NotifyConfig;
use leadpost_core::types::{ChannelKind, DeliveryReport, Lead};

use crate::base::Notifier;
use crate::email::EmailNotifier;
use crate::sms::SmsNotifier;
use crate::telegram::TelegramNotifier;

// ─────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────

/// Holds at most one notifier per channel.
#[derive(Default)]
pub struct Dispatcher {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one notifier for every configured channel.
    ///
    /// Unconfigured channels are skipped silently; they never show up in
    /// the report.
    pub fn from_config(config: &NotifyConfig) -> Self {
        let mut dispatcher = Self::new();
        let client = reqwest::Client::new();

        if config.mail.is_configured() {
            dispatcher.register(Arc::new(EmailNotifier::new(config.mail.clone())));
        }
        if config.sms.is_configured() {
            dispatcher.register(Arc::new(SmsNotifier::new(
                client.clone(),
                config.sms.clone(),
            )));
        }
        if config.telegram.is_configured() {
            dispatcher.register(Arc::new(TelegramNotifier::new(
                client,
                config.telegram.clone(),
            )));
        }

        dispatcher
    }

    /// Register a notifier. Overwrites any previous notifier of the same kind.
    pub fn register(&mut self, notifier: Arc<dyn Notifier>) {
        let kind = notifier.kind();
        debug!(channel = %kind, "registered notifier");
        self.notifiers.retain(|n| n.kind() != kind);
        self.notifiers.push(notifier);
    }

    /// Names of registered channels, in report order.
    pub fn channel_names(&self) -> Vec<&'static str> {
        ChannelKind::ALL
            .iter()
            .filter(|k| self.notifiers.iter().any(|n| n.kind() == **k))
            .map(|k| k.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Send the lead through every registered notifier.
    pub async fn dispatch(&self, lead: &Lead) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        if self.notifiers.is_empty() {
            warn!(lead_id = lead.id(), "no notification channels configured");
            return report;
        }

        info!(
            lead_id = lead.id(),
            channels = ?self.channel_names(),
            "dispatching lead notification"
        );

        let attempts = self.notifiers.iter().map(|notifier| async move {
            let kind = notifier.kind();
            (kind, notifier.send(lead).await)
        });
        let mut outcomes = join_all(attempts).await;
        outcomes.sort_by_key(|(kind, _)| ChannelKind::ALL.iter().position(|k| k == kind));

        for (kind, outcome) in outcomes {
            match outcome {
                Ok(()) => report.mark_sent(kind),
                Err(e) => {
                    warn!(channel = %kind, lead_id = lead.id(), error = %e, "notification failed");
                    report.record_failure(kind, e);
                }
            }
        }

        info!(
            lead_id = lead.id(),
            sent = report.sent_count(),
            failed = report.errors.len(),
            "lead notification finished"
        );
        report
    }
}

/// Dispatch a lead through every channel configured in `config`.
///
/// Never fails: each channel's outcome lands in the returned report.
pub async fn dispatch(lead: &Lead, config: &NotifyConfig) -> DeliveryReport {
    Dispatcher::from_config(config).dispatch(lead).await
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChannelError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Fake notifier with a scripted outcome.
    struct FakeNotifier {
        kind: ChannelKind,
        fail_with: Option<&'static str>,
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    impl FakeNotifier {
        fn ok(kind: ChannelKind) -> Self {
            Self {
                kind,
                fail_with: None,
                delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(kind: ChannelKind, detail: &'static str) -> Self {
            Self {
                fail_with: Some(detail),
                ..Self::ok(kind)
            }
        }
    }

    #[async_trait::async_trait]
    impl Notifier for FakeNotifier {
        fn kind(&self) -> ChannelKind {
            self.kind
        }

        async fn send(&self, _lead: &Lead) -> Result<(), ChannelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            match self.fail_with {
                Some(detail) => Err(ChannelError::Transport(detail.into())),
                None => Ok(()),
            }
        }
    }

    fn lead() -> Lead {
        Lead::new(42, "A. Ivanov", "+79001234567", "a@x.ru", "Consultation")
    }

    fn telegram_only(api_base: &str) -> NotifyConfig {
        let mut config = NotifyConfig::default();
        config.telegram.bot_token = "123:ABC".into();
        config.telegram.chat_id = "5262932064".into();
        config.telegram.api_base = api_base.into();
        config
    }

    #[test]
    fn test_new_dispatcher_empty() {
        let d = Dispatcher::new();
        assert!(d.is_empty());
        assert_eq!(d.len(), 0);
        assert!(d.channel_names().is_empty());
    }

    #[test]
    fn test_register_overwrites_same_kind() {
        let mut d = Dispatcher::new();
        d.register(Arc::new(FakeNotifier::ok(ChannelKind::Sms)));
        d.register(Arc::new(FakeNotifier::ok(ChannelKind::Sms)));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_channel_names_in_report_order() {
        let mut d = Dispatcher::new();
        d.register(Arc::new(FakeNotifier::ok(ChannelKind::Telegram)));
        d.register(Arc::new(FakeNotifier::ok(ChannelKind::Email)));
        assert_eq!(d.channel_names(), vec!["email", "telegram"]);
    }

    #[test]
    fn test_from_config_skips_unconfigured() {
        assert!(Dispatcher::from_config(&NotifyConfig::default()).is_empty());

        let d = Dispatcher::from_config(&telegram_only("https://api.telegram.org"));
        assert_eq!(d.channel_names(), vec!["telegram"]);
    }

    #[tokio::test]
    async fn test_dispatch_nothing_configured() {
        let report = dispatch(&lead(), &NotifyConfig::default()).await;
        assert!(!report.email_sent);
        assert!(!report.sms_sent);
        assert!(!report.telegram_sent);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_single_channel_failure() {
        let mut d = Dispatcher::new();
        d.register(Arc::new(FakeNotifier::failing(ChannelKind::Email, "connection refused")));

        let report = d.dispatch(&lead()).await;
        assert!(!report.email_sent);
        assert_eq!(report.errors, vec!["Email error: connection refused"]);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_channel_order() {
        let mut d = Dispatcher::new();
        // Telegram fails fast, email fails slowly: report order is still email first.
        d.register(Arc::new(FakeNotifier::failing(ChannelKind::Telegram, "tg down")));
        d.register(Arc::new(FakeNotifier::ok(ChannelKind::Sms)));
        d.register(Arc::new(FakeNotifier {
            delay: Duration::from_millis(50),
            ..FakeNotifier::failing(ChannelKind::Email, "smtp down")
        }));

        let report = d.dispatch(&lead()).await;
        assert!(!report.email_sent);
        assert!(report.sms_sent);
        assert!(!report.telegram_sent);
        assert_eq!(
            report.errors,
            vec!["Email error: smtp down", "Telegram error: tg down"]
        );
    }

    #[tokio::test]
    async fn test_each_notifier_called_once() {
        let fake = FakeNotifier::ok(ChannelKind::Email);
        let calls = fake.calls.clone();
        let mut d = Dispatcher::new();
        d.register(Arc::new(fake));

        d.dispatch(&lead()).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_attempts_run_concurrently() {
        let mut d = Dispatcher::new();
        for kind in ChannelKind::ALL {
            d.register(Arc::new(FakeNotifier {
                delay: Duration::from_millis(200),
                ..FakeNotifier::ok(kind)
            }));
        }

        let started = std::time::Instant::now();
        let report = d.dispatch(&lead()).await;
        assert_eq!(report.sent_count(), 3);
        assert!(started.elapsed() < Duration::from_millis(550));
    }

    #[tokio::test]
    async fn test_scenario_telegram_only_reachable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let report = dispatch(&lead(), &telegram_only(&mock_server.uri())).await;
        assert!(!report.email_sent);
        assert!(!report.sms_sent);
        assert!(report.telegram_sent);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_scenario_telegram_unreachable() {
        let report = dispatch(&lead(), &telegram_only("http://127.0.0.1:1")).await;
        assert!(!report.telegram_sent);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Telegram error: error sending request: "));
        assert!(report.errors[0].to_lowercase().contains("connect"));
    }

    #[tokio::test]
    async fn test_slow_providers_time_out_into_report() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sms/send"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "OK" }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let config = telegram_only(&mock_server.uri());
        let sms = leadpost_core::config::SmsConfig {
            api_key: "key".into(),
            recipient_phone: "+79990000000".into(),
            api_base: mock_server.uri(),
        };
        let timeout = Duration::from_millis(200);

        let mut d = Dispatcher::new();
        d.register(Arc::new(
            TelegramNotifier::new(reqwest::Client::new(), config.telegram).with_timeout(timeout),
        ));
        d.register(Arc::new(
            SmsNotifier::new(reqwest::Client::new(), sms).with_timeout(timeout),
        ));

        let started = std::time::Instant::now();
        let report = d.dispatch(&lead()).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!report.sms_sent);
        assert!(!report.telegram_sent);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("SMS error: request timed out"));
        assert!(report.errors[1].starts_with("Telegram error: request timed out"));
    }

    #[tokio::test]
    async fn test_sms_gateway_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sms/send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ERROR",
                "status_text": "Invalid api_id"
            })))
            .mount(&mock_server)
            .await;

        let mut config = NotifyConfig::default();
        config.sms.api_key = "bad".into();
        config.sms.recipient_phone = "+79990000000".into();
        config.sms.api_base = mock_server.uri();

        let report = dispatch(&lead(), &config).await;
        assert!(!report.sms_sent);
        assert_eq!(report.errors, vec!["SMS error: Invalid api_id"]);
    }
}

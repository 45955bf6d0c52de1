//! Notifier trait: the abstract interface every outbound channel implements.
//!
//! Each channel (email, SMS, Telegram) implements this trait to:
//! - `kind()`: which report slot it fills
//! - `send()`: deliver one lead announcement, exactly once, no retries

use async_trait::async_trait;
use leadpost_core::types::{ChannelKind, Lead};

use crate::error::ChannelError;

/// Every outbound notification channel implements this trait.
///
/// The `Dispatcher` holds `Arc<dyn Notifier>` and fans a lead out to all
/// registered notifiers concurrently.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Which channel this notifier delivers through.
    fn kind(&self) -> ChannelKind;

    /// Deliver the lead. Errors are reported, never retried.
    async fn send(&self, lead: &Lead) -> Result<(), ChannelError>;
}

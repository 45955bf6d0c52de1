//! leadpost-channels: outbound notification channels for new leads.
//!
//! - [`email`]: SMTP via `lettre`
//! - [`sms`]: sms.ru-compatible HTTP gateway
//! - [`telegram`]: Bot API `sendMessage`
//!
//! [`dispatcher::dispatch`] is the entry point: it sends one lead through
//! every configured channel and returns a [`DeliveryReport`].
//!
//! [`DeliveryReport`]: leadpost_core::types::DeliveryReport

pub mod base;
pub mod dispatcher;
pub mod email;
pub mod error;
pub mod formatting;
pub mod sms;
pub mod telegram;

pub use base::Notifier;
pub use dispatcher::{dispatch, Dispatcher};
pub use error::ChannelError;

//! leadpost core: shared types, configuration, and small helpers.
//!
//! - **types**: `Lead`, `NotificationRequest`, `DeliveryReport`, `ChannelKind`
//! - **config**: JSON + environment configuration
//! - **utils**: data directory and string helpers

pub mod config;
pub mod types;
pub mod utils;

pub use types::{ChannelKind, DeliveryReport, Lead, MissingFields, NotificationRequest};

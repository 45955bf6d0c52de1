//! `leadpost send`: dispatch one lead from the command line.
//!
//! Prints the delivery report as pretty JSON. Channel failures are part of
//! the report, so the exit code stays 0.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use leadpost_channels::Dispatcher;
use leadpost_core::config::NotifyConfig;
use leadpost_core::types::{DeliveryReport, Lead};

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Application id
    #[arg(long)]
    pub id: i64,

    /// Customer name
    #[arg(long)]
    pub name: String,

    /// Customer phone
    #[arg(long)]
    pub phone: String,

    /// Customer email
    #[arg(long)]
    pub email: String,

    /// Requested service
    #[arg(long)]
    pub service: String,

    /// Optional free-text message
    #[arg(long)]
    pub message: Option<String>,
}

impl SendArgs {
    fn into_lead(self) -> Lead {
        let lead = Lead::new(self.id, self.name, self.phone, self.email, self.service);
        match self.message {
            Some(message) => lead.with_message(message),
            None => lead,
        }
    }
}

/// Run the send command.
pub async fn run(args: SendArgs, config: &NotifyConfig) -> Result<()> {
    let dispatcher = Dispatcher::from_config(config);
    if dispatcher.is_empty() {
        eprintln!(
            "{}",
            "no channels configured; nothing will be sent (see `leadpost status`)".yellow()
        );
    }

    let report = dispatcher.dispatch(&args.into_lead()).await;
    println!("{}", render_report(&report)?);
    Ok(())
}

fn render_report(report: &DeliveryReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize delivery report")
}

//! `leadpost status`: show the config path and per-channel readiness.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use leadpost_core::config::{get_config_path, load_config, Config};
use leadpost_core::types::ChannelKind;
use leadpost_core::utils::mask_secret;

use crate::helpers::configured_mark;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);
    let config = load_config(Some(&path));

    println!();
    println!("{}", "📬 leadpost Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        if path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!(
        "  {:<18} {}:{}",
        "Gateway:".bold(),
        config.gateway.host,
        config.gateway.port
    );

    println!();
    println!("  {}", "Channels:".bold());
    for kind in ChannelKind::ALL {
        println!(
            "    {:<20} {}",
            kind.label(),
            configured_mark(config.notify.is_configured(kind))
        );
        if let Some(detail) = channel_detail(&config, kind) {
            println!("    {:<20} {}", "", detail.dimmed());
        }
    }
    println!();

    Ok(())
}

/// One-line summary of where a configured channel delivers to.
fn channel_detail(config: &Config, kind: ChannelKind) -> Option<String> {
    if !config.notify.is_configured(kind) {
        return None;
    }
    let notify = &config.notify;
    Some(match kind {
        ChannelKind::Email => format!(
            "{} via {}:{} ({})",
            notify.mail.recipient,
            notify.mail.host,
            notify.mail.port,
            if notify.mail.use_ssl {
                "ssl"
            } else if notify.mail.use_tls {
                "starttls"
            } else {
                "plain"
            }
        ),
        ChannelKind::Sms => format!(
            "{} (key {})",
            notify.sms.recipient_phone,
            mask_secret(&notify.sms.api_key)
        ),
        ChannelKind::Telegram => format!(
            "chat {} (token {})",
            notify.telegram.chat_id,
            mask_secret(&notify.telegram.bot_token)
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_detail_unconfigured_is_none() {
        let config = Config::default();
        for kind in ChannelKind::ALL {
            assert!(channel_detail(&config, kind).is_none());
        }
    }

    #[test]
    fn channel_detail_masks_secrets() {
        let mut config = Config::default();
        config.notify.telegram.bot_token = "123456:SECRETTOKEN".into();
        config.notify.telegram.chat_id = "42".into();

        let detail = channel_detail(&config, ChannelKind::Telegram).unwrap();
        assert!(detail.contains("chat 42"));
        assert!(!detail.contains("SECRET"));
        assert!(detail.ends_with("OKEN)"));
    }

    #[test]
    fn channel_detail_mail_mode() {
        let mut config = Config::default();
        config.notify.mail.username = "bot@example.com".into();
        config.notify.mail.password = "pw".into();
        config.notify.mail.recipient = "sales@example.com".into();

        let detail = channel_detail(&config, ChannelKind::Email).unwrap();
        assert_eq!(detail, "sales@example.com via smtp.mail.ru:587 (starttls)");
    }
}

//! Config loader: reads `~/.leadpost/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.leadpost/config.json`
//! 3. Flat env vars of the original deployment (`SMTP_HOST`, `SMS_API_KEY`, …)
//! 4. Environment variables `LEADPOST_<SECTION>__<FIELD>` (override everything)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    apply_env_overrides(read_config_file(&config_path))
}

/// Read the JSON file only, without env overrides.
fn read_config_file(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides from the process environment.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using `lookup` as the environment.
///
/// Flat names of the original deployment:
/// - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASSWORD` → `notify.mail.*`
/// - `NOTIFICATION_EMAIL` → `notify.mail.recipient`
/// - `NOTIFICATION_PHONE` → `notify.sms.recipient_phone`
/// - `SMS_API_KEY` → `notify.sms.api_key`
/// - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID` → `notify.telegram.*`
///
/// Namespaced names (`LEADPOST_<SECTION>__<FIELD>`) are applied afterwards:
/// - `LEADPOST_MAIL__{HOST,PORT,USERNAME,PASSWORD,RECIPIENT,FROM_ADDRESS,USE_TLS,USE_SSL}`
/// - `LEADPOST_SMS__{API_KEY,RECIPIENT_PHONE,API_BASE}`
/// - `LEADPOST_TELEGRAM__{BOT_TOKEN,CHAT_ID,API_BASE}`
/// - `LEADPOST_GATEWAY__{HOST,PORT}`
fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let mail = &mut config.notify.mail;
    let sms = &mut config.notify.sms;
    let telegram = &mut config.notify.telegram;
    let gateway = &mut config.gateway;

    // Flat names
    set_string(&lookup, "SMTP_HOST", &mut mail.host);
    set_parsed(&lookup, "SMTP_PORT", &mut mail.port);
    set_string(&lookup, "SMTP_USER", &mut mail.username);
    set_string(&lookup, "SMTP_PASSWORD", &mut mail.password);
    set_string(&lookup, "NOTIFICATION_EMAIL", &mut mail.recipient);
    set_string(&lookup, "NOTIFICATION_PHONE", &mut sms.recipient_phone);
    set_string(&lookup, "SMS_API_KEY", &mut sms.api_key);
    set_string(&lookup, "TELEGRAM_BOT_TOKEN", &mut telegram.bot_token);
    set_string(&lookup, "TELEGRAM_CHAT_ID", &mut telegram.chat_id);

    // Mail
    set_string(&lookup, "LEADPOST_MAIL__HOST", &mut mail.host);
    set_parsed(&lookup, "LEADPOST_MAIL__PORT", &mut mail.port);
    set_string(&lookup, "LEADPOST_MAIL__USERNAME", &mut mail.username);
    set_string(&lookup, "LEADPOST_MAIL__PASSWORD", &mut mail.password);
    set_string(&lookup, "LEADPOST_MAIL__RECIPIENT", &mut mail.recipient);
    set_string(&lookup, "LEADPOST_MAIL__FROM_ADDRESS", &mut mail.from_address);
    set_bool(&lookup, "LEADPOST_MAIL__USE_TLS", &mut mail.use_tls);
    set_bool(&lookup, "LEADPOST_MAIL__USE_SSL", &mut mail.use_ssl);

    // SMS
    set_string(&lookup, "LEADPOST_SMS__API_KEY", &mut sms.api_key);
    set_string(&lookup, "LEADPOST_SMS__RECIPIENT_PHONE", &mut sms.recipient_phone);
    set_string(&lookup, "LEADPOST_SMS__API_BASE", &mut sms.api_base);

    // Telegram
    set_string(&lookup, "LEADPOST_TELEGRAM__BOT_TOKEN", &mut telegram.bot_token);
    set_string(&lookup, "LEADPOST_TELEGRAM__CHAT_ID", &mut telegram.chat_id);
    set_string(&lookup, "LEADPOST_TELEGRAM__API_BASE", &mut telegram.api_base);

    // Gateway
    set_string(&lookup, "LEADPOST_GATEWAY__HOST", &mut gateway.host);
    set_parsed(&lookup, "LEADPOST_GATEWAY__PORT", &mut gateway.port);

    config
}

fn set_string<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, target: &mut String) {
    if let Some(val) = lookup(key) {
        *target = val;
    }
}

fn set_parsed<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(val) = lookup(key) {
        match val.trim().parse::<T>() {
            Ok(v) => *target = v,
            Err(_) => warn!(key, value = %val, "ignoring unparseable env override"),
        }
    }
}

fn set_bool<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, target: &mut bool) {
    if let Some(val) = lookup(key) {
        *target = val == "true" || val == "1";
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

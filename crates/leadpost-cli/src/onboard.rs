//! `leadpost onboard`: write a default config file to fill in.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use leadpost_core::config::{get_config_path, save_config, Config};

/// Run the onboard command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    println!();
    println!("{}", "📬 leadpost: Setup".cyan().bold());
    println!();

    if write_default_config(&path)? {
        println!("  {} created config at {}", "✓".green(), path.display());
    } else {
        println!("  {} config already exists at {}", "✓".green(), path.display());
    }

    println!();
    println!(
        "{}",
        "  Fill in the mail, sms and telegram sections, then run `leadpost status`.".green()
    );
    println!();

    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
///
/// Env overrides are not applied, so secrets from the environment never
/// reach disk.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write config to {}", path.display()))?;
    Ok(true)
}

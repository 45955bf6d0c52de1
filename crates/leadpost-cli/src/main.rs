//! leadpost CLI: entry point.
//!
//! # Commands
//!
//! - `leadpost onboard`: write a default config file
//! - `leadpost status`: show which channels are configured
//! - `leadpost send --id .. --name .. --phone .. --email .. --service ..`:
//!   dispatch one lead and print the delivery report
//! - `leadpost gateway [--host H] [--port P]`: serve the HTTP gateway

mod gateway;
mod helpers;
mod onboard;
mod send;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use leadpost_core::config::load_config;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 📬 leadpost: new-lead notifications over email, SMS and Telegram
#[derive(Parser)]
#[command(name = "leadpost", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.leadpost/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration file
    Onboard,

    /// Show configuration and channel status
    Status,

    /// Send notifications for one lead and print the delivery report
    Send(send::SendArgs),

    /// Serve the HTTP gateway until Ctrl+C
    Gateway {
        /// Bind address (overrides gateway.host)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides gateway.port)
        #[arg(long)]
        port: Option<u16>,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs);

    let config_path = cli.config.as_deref().map(|p| helpers::expand_tilde(&p.to_string_lossy()));

    match cli.command {
        Commands::Onboard => onboard::run(config_path.as_deref()),
        Commands::Status => status::run(config_path.as_deref()),
        Commands::Send(args) => {
            let config = load_config(config_path.as_deref());
            send::run(args, &config.notify).await
        }
        Commands::Gateway { host, port } => {
            let config = load_config(config_path.as_deref());
            gateway::run(config, host, port).await
        }
    }
}

/// Initialize tracing/logging. `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "leadpost=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

//! Warden CLI — the operator console for the bot core.
//!
//! The chat-platform wiring (command registration, voice, formatting) lives
//! elsewhere; this binary drives the same entry points from a terminal so
//! the core can be operated and inspected locally.

mod console;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use warden_config::{CliOverrides, WardenConfig};
use warden_core::Bot;
use warden_types::PrincipalId;

#[derive(Parser)]
#[command(name = "warden", version, about = "Chat-bot permission/eval/counter core")]
struct Cli {
    /// Run a single console command and exit (non-interactive)
    #[arg(short, long)]
    exec: Option<String>,

    /// Principal id to act as (defaults to the configured owner)
    #[arg(long)]
    principal: Option<u64>,

    /// Bootstrap owner id (overrides WARDEN_OWNER_ID and config.toml)
    #[arg(long)]
    owner_id: Option<u64>,

    /// State directory (overrides WARDEN_STATE_DIR)
    #[arg(long)]
    state_dir: Option<std::path::PathBuf>,

    /// Enable verbose/debug logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = WardenConfig::load(CliOverrides {
        owner_id: cli.owner_id,
        state_dir: cli.state_dir,
    })
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::debug!("state dir: {}", config.state_dir.display());

    let bot = Bot::new(config.state_dir.clone())
        .await
        .context("Failed to open the state directory")?;
    bot.bootstrap(config.owner_id)
        .await
        .context("Failed to bootstrap the owner role")?;

    let acting = cli.principal.map(PrincipalId).unwrap_or(config.owner_id);

    if let Some(line) = cli.exec {
        console::run_line(&bot, acting, &line).await;
        return Ok(());
    }

    console::repl(&bot, acting).await
}

mod config;
mod platform;
mod quote;
mod stats;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::quote::dispatch::QuoteDispatcher;
use crate::stats::QuoteStatsStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,autoquoter=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Stats database: {}", config.stats.database_path.display());

    let stats = QuoteStatsStore::open(&config.stats.database_path)?;
    let dispatcher = Arc::new(QuoteDispatcher::new(stats));

    info!("Bot is starting...");
    platform::discord::run(dispatcher, &config.discord.bot_token).await?;

    Ok(())
}

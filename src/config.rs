use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub discord: DiscordConfig,
    #[serde(default = "default_stats_config")]
    pub stats: StatsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscordConfig {
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatsConfig {
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("autoquoter.db")
}

fn default_stats_config() -> StatsConfig {
    StatsConfig {
        database_path: default_db_path(),
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

use crate::config::toml_config::{LocatorConfig, DEFAULT_CONFIG_FILE};
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "store-locator")]
#[command(about = "Store locator: map pins from a store feed, place search and a synced store list")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    /// Store feed location (URL or file path), overrides feed.location
    #[arg(long)]
    pub feed: Option<String>,

    /// Map provider API key, overrides provider.api_key
    #[arg(long, env = "MAPS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Run these console commands and exit instead of reading stdin
    #[arg(short = 'c', long = "command")]
    pub commands: Vec<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Load the config file (explicit path, or `store-locator.toml` when it
    /// exists) and apply command line overrides on top.
    pub fn resolve(&self) -> Result<LocatorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                LocatorConfig::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                tracing::info!("📁 Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                LocatorConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                tracing::debug!("No configuration file, using defaults");
                LocatorConfig::default()
            }
        };

        // 命令列設定優先
        if let Some(feed) = &self.feed {
            config.feed.location = feed.clone();
            tracing::info!("🔧 Feed location overridden to: {}", feed);
        }
        if let Some(api_key) = &self.api_key {
            config.provider.api_key = Some(api_key.clone());
        }

        Ok(config)
    }
}

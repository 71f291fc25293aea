use crate::config::toml_config::TomlConfig;
use crate::config::{clean_account_ids, RunConfig};
use crate::core::selector::TieBreak;
use crate::utils::error::Result;
use crate::utils::retry::RetryPolicy;
use crate::utils::validation::Validate;
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "steam-sorter")]
#[command(about = "Rank the games of Steam libraries by HowLongToBeat main story time")]
pub struct CliConfig {
    /// TOML configuration file; command line values override it
    #[arg(short, long)]
    pub config: Option<String>,

    /// Steam Web API key
    #[arg(long, env = "STEAM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Steam ids to analyze, in order (comma separated or repeated)
    #[arg(long = "steam-id", env = "STEAM_IDS", value_delimiter = ',')]
    pub steam_ids: Vec<String>,

    /// Report file, overwritten on every run
    #[arg(short, long)]
    pub output: Option<String>,

    /// How to pick among several HowLongToBeat matches
    #[arg(long)]
    pub tie_break: Option<TieBreak>,

    /// Lookups running at the same time
    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    /// Minimum spacing between two lookups, in milliseconds
    #[arg(long)]
    pub min_interval_ms: Option<u64>,

    /// Extra attempts for requests failing with a transient error
    #[arg(long)]
    pub retry_attempts: Option<u32>,

    /// Delay before the first retry, doubled on each further retry
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    #[arg(long)]
    pub steam_endpoint: Option<String>,

    #[arg(long)]
    pub hltb_endpoint: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Merges the optional TOML file with the command line and validates the
    /// result.
    pub fn resolve(&self) -> Result<RunConfig> {
        let base = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        let config = self.apply_overrides(base.to_run_config());
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, mut config: RunConfig) -> RunConfig {
        if let Some(api_key) = &self.api_key {
            config.credential = api_key.clone();
        }
        let steam_ids = clean_account_ids(self.steam_ids.clone());
        if !steam_ids.is_empty() {
            config.account_ids = steam_ids;
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(tie_break) = self.tie_break {
            config.tie_break = tie_break;
        }
        if let Some(concurrent) = self.concurrent_requests {
            config.concurrent_requests = concurrent;
        }
        if let Some(ms) = self.min_interval_ms {
            config.min_lookup_interval = Duration::from_millis(ms);
        }
        if self.retry_attempts.is_some() || self.retry_delay_ms.is_some() {
            config.retry = RetryPolicy::new(
                self.retry_attempts.unwrap_or(config.retry.attempts),
                self.retry_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(config.retry.base_delay),
            );
        }
        if let Some(endpoint) = &self.steam_endpoint {
            config.steam_endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &self.hltb_endpoint {
            config.lookup_endpoint = endpoint.clone();
        }
        config
    }
}

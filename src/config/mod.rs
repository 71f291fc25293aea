#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::hltb::DEFAULT_HLTB_ENDPOINT;
use crate::adapters::steam::DEFAULT_STEAM_ENDPOINT;
use crate::core::selector::TieBreak;
use crate::utils::error::{Result, SorterError};
use crate::utils::retry::RetryPolicy;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_OUTPUT_PATH: &str = "steam_games_completion_times.txt";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 1;
pub const MAX_CONCURRENT_REQUESTS: usize = 16;

/// Everything one run needs. Built once at start-up, never changed after.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub credential: String,
    pub account_ids: Vec<String>,
    pub output_path: String,
    pub steam_endpoint: String,
    pub steam_timeout: Duration,
    pub lookup_endpoint: String,
    pub lookup_timeout: Duration,
    pub tie_break: TieBreak,
    pub concurrent_requests: usize,
    pub min_lookup_interval: Duration,
    pub retry: RetryPolicy,
}

impl RunConfig {
    pub fn new(
        credential: impl Into<String>,
        account_ids: Vec<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            credential: credential.into(),
            account_ids: clean_account_ids(account_ids),
            output_path: output_path.into(),
            steam_endpoint: DEFAULT_STEAM_ENDPOINT.to_string(),
            steam_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            lookup_endpoint: DEFAULT_HLTB_ENDPOINT.to_string(),
            lookup_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            tie_break: TieBreak::default(),
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            min_lookup_interval: Duration::ZERO,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_endpoints(
        mut self,
        steam_endpoint: impl Into<String>,
        lookup_endpoint: impl Into<String>,
    ) -> Self {
        self.steam_endpoint = steam_endpoint.into();
        self.lookup_endpoint = lookup_endpoint.into();
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_concurrency(mut self, concurrent_requests: usize, min_interval: Duration) -> Self {
        self.concurrent_requests = concurrent_requests;
        self.min_lookup_interval = min_interval;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Trims ids and drops blank ones, keeping the configured order.
pub fn clean_account_ids(ids: Vec<String>) -> Vec<String> {
    ids.into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("steam.api_key", &self.credential)?;
        if self.credential.contains("${") {
            return Err(SorterError::ConfigValidationError {
                field: "steam.api_key".to_string(),
                message: "environment variable placeholder was not resolved".to_string(),
            });
        }
        validation::validate_account_ids("steam.account_ids", &self.account_ids)?;
        validation::validate_path("report.output_path", &self.output_path)?;
        validation::validate_url("steam.endpoint", &self.steam_endpoint)?;
        validation::validate_url("lookup.endpoint", &self.lookup_endpoint)?;
        validation::validate_range(
            "lookup.concurrent_requests",
            self.concurrent_requests,
            1,
            MAX_CONCURRENT_REQUESTS,
        )?;

        if self.tie_break.is_interactive() && self.concurrent_requests > 1 {
            return Err(SorterError::ConfigValidationError {
                field: "lookup.tie_break".to_string(),
                message: "manual tie-break needs lookup.concurrent_requests = 1".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RunConfig {
        RunConfig::new("KEY", vec!["76561197960287930".to_string()], "out.txt")
    }

    #[test]
    fn test_defaults_validate() {
        let config = valid();
        assert!(config.validate().is_ok());
        assert_eq!(config.concurrent_requests, 1);
        assert_eq!(config.tie_break, TieBreak::FirstResult);
        assert_eq!(config.retry, RetryPolicy::none());
    }

    #[test]
    fn test_blank_account_ids_are_dropped() {
        let config = RunConfig::new(
            "KEY",
            vec!["".to_string(), " 1 ".to_string(), "  ".to_string(), "2".to_string()],
            "out.txt",
        );
        assert_eq!(config.account_ids, vec!["1", "2"]);
    }

    #[test]
    fn test_missing_accounts_rejected() {
        let config = RunConfig::new("KEY", vec!["".to_string()], "out.txt");
        assert!(matches!(
            config.validate(),
            Err(SorterError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_account_ids_are_opaque() {
        let config = RunConfig::new("KEY", vec!["my-vanity-account".to_string()], "out.txt");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_or_unresolved_credential_rejected() {
        let mut config = valid();
        config.credential = "".to_string();
        assert!(config.validate().is_err());

        config.credential = "${STEAM_API_KEY}".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_manual_tie_break_requires_sequential_lookups() {
        let config = valid()
            .with_tie_break(TieBreak::Manual)
            .with_concurrency(4, Duration::ZERO);
        assert!(config.validate().is_err());

        let config = valid().with_tie_break(TieBreak::Manual);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        assert!(valid().with_concurrency(0, Duration::ZERO).validate().is_err());
        assert!(valid()
            .with_concurrency(MAX_CONCURRENT_REQUESTS + 1, Duration::ZERO)
            .validate()
            .is_err());
    }
}

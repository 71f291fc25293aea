use crate::config::{RunConfig, DEFAULT_OUTPUT_PATH};
use crate::core::selector::TieBreak;
use crate::utils::error::{Result, SorterError};
use crate::utils::retry::RetryPolicy;
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub steam: SteamConfig,
    pub lookup: Option<LookupConfig>,
    pub retry: Option<RetryConfig>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SteamConfig {
    pub api_key: Option<String>,
    pub account_ids: Option<Vec<String>>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    pub endpoint: Option<String>,
    pub tie_break: Option<TieBreak>,
    pub concurrent_requests: Option<usize>,
    pub min_interval_ms: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryConfig {
    pub attempts: Option<u32>,
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left
    /// as written so validation can point at them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SorterError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn output_path(&self) -> &str {
        self.report
            .as_ref()
            .and_then(|r| r.output_path.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let retry = self.retry.clone().unwrap_or_default();
        RetryPolicy::new(
            retry.attempts.unwrap_or(0),
            Duration::from_millis(retry.delay_ms.unwrap_or(1000)),
        )
    }

    /// Resolves into a run configuration, filling the defaults. Does not
    /// validate.
    pub fn to_run_config(&self) -> RunConfig {
        let lookup = self.lookup.clone().unwrap_or_default();

        let mut config = RunConfig::new(
            self.steam.api_key.clone().unwrap_or_default(),
            self.steam.account_ids.clone().unwrap_or_default(),
            self.output_path(),
        )
        .with_retry(self.retry_policy());

        if let Some(endpoint) = &self.steam.endpoint {
            config.steam_endpoint = endpoint.clone();
        }
        if let Some(seconds) = self.steam.timeout_seconds {
            config.steam_timeout = Duration::from_secs(seconds);
        }
        if let Some(endpoint) = lookup.endpoint {
            config.lookup_endpoint = endpoint;
        }
        if let Some(seconds) = lookup.timeout_seconds {
            config.lookup_timeout = Duration::from_secs(seconds);
        }
        if let Some(tie_break) = lookup.tie_break {
            config.tie_break = tie_break;
        }
        if let Some(concurrent) = lookup.concurrent_requests {
            config.concurrent_requests = concurrent;
        }
        if let Some(ms) = lookup.min_interval_ms {
            config.min_lookup_interval = Duration::from_millis(ms);
        }

        config
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_run_config().validate()
    }
}

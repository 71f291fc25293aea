use crate::domain::model::{Candidate, Hours};
use crate::domain::ports::DurationLookup;
use crate::utils::error::{Result, SorterError};
use crate::utils::rate_limit::Pacer;
use crate::utils::retry::{with_retry, RetryPolicy};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

pub const DEFAULT_HLTB_ENDPOINT: &str = "https://howlongtobeat.com/api/search";
const HLTB_REFERER: &str = "https://howlongtobeat.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
const PAGE_SIZE: u32 = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    search_type: &'static str,
    search_terms: Vec<&'a str>,
    search_page: u32,
    size: u32,
    search_options: serde_json::Value,
}

impl<'a> SearchRequest<'a> {
    fn for_title(title: &'a str) -> Self {
        Self {
            search_type: "games",
            search_terms: title.split_whitespace().collect(),
            search_page: 1,
            size: PAGE_SIZE,
            search_options: serde_json::json!({
                "games": {
                    "userId": 0,
                    "platform": "",
                    "sortCategory": "popular",
                    "rangeCategory": "main",
                    "rangeTime": {"min": 0, "max": 0},
                    "gameplay": {"perspective": "", "flow": "", "genre": ""},
                    "modifier": ""
                },
                "users": {"sortCategory": "postcount"},
                "filter": "",
                "sort": 0,
                "randomizer": 0
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<GameRecord>,
}

#[derive(Debug, Deserialize)]
struct GameRecord {
    #[serde(default)]
    game_id: u64,
    #[serde(default)]
    game_name: String,
    /// Main story time in seconds.
    #[serde(default)]
    comp_main: f64,
}

impl From<GameRecord> for Candidate {
    fn from(record: GameRecord) -> Self {
        Candidate {
            id: record.game_id,
            title: record.game_name,
            main_story_hours: seconds_to_hours(record.comp_main),
        }
    }
}

/// Hours rounded to two decimals; zero or negative means "no data".
pub fn seconds_to_hours(seconds: f64) -> Option<Hours> {
    if seconds > 0.0 {
        Some((seconds / 3600.0 * 100.0).round() / 100.0)
    } else {
        None
    }
}

/// Search key published in the site's `_app` bundle. The keyed search URL
/// changes on every deploy of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchKey {
    /// Search path announced next to the key, e.g. `/api/seek/`.
    api_path: Option<String>,
    key: String,
}

impl SearchKey {
    fn search_url(&self, endpoint: &Url) -> Result<String> {
        match &self.api_path {
            Some(api_path) => endpoint
                .join(&format!("{}{}", api_path, self.key))
                .map(String::from)
                .map_err(|e| SorterError::MalformedResponseError {
                    url: endpoint.to_string(),
                    message: format!("unusable search path '{}': {}", api_path, e),
                }),
            None => Ok(format!(
                "{}/{}",
                endpoint.as_str().trim_end_matches('/'),
                self.key
            )),
        }
    }
}

fn find_app_script(html: &str) -> Result<Option<String>> {
    let re = Regex::new(r#"src="([^"]*_app-[^"]*\.js)""#).map_err(pattern_error)?;
    Ok(re.captures(html).map(|caps| caps[1].to_string()))
}

fn extract_search_key(script: &str) -> Result<Option<SearchKey>> {
    let concat_call = Regex::new(r#"\.concat\("([^"]*)"\)"#).map_err(pattern_error)?;
    let keyed_path =
        Regex::new(r#""(/api/\w+/)"((?:\.concat\("[^"]*"\))+)"#).map_err(pattern_error)?;

    if let Some(caps) = keyed_path.captures(script) {
        let key: String = concat_call
            .captures_iter(&caps[2])
            .map(|part| part[1].to_string())
            .collect();
        if !key.is_empty() {
            return Ok(Some(SearchKey {
                api_path: Some(caps[1].to_string()),
                key,
            }));
        }
    }

    let user_id =
        Regex::new(r#"users\s*:\s*\{\s*id\s*:\s*"([a-zA-Z0-9]+)""#).map_err(pattern_error)?;
    Ok(user_id.captures(script).map(|caps| SearchKey {
        api_path: None,
        key: caps[1].to_string(),
    }))
}

fn pattern_error(e: regex::Error) -> SorterError {
    SorterError::ProcessingError {
        message: format!("invalid search key pattern: {}", e),
    }
}

/// Client for the HowLongToBeat search endpoint.
pub struct HltbClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
    retry: RetryPolicy,
    pacer: Pacer,
    keyed_url: OnceCell<String>,
}

impl HltbClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::none(),
            pacer: Pacer::unlimited(),
            keyed_url: OnceCell::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Minimum spacing between two search requests, retries included.
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.pacer = Pacer::new(min_interval);
        self
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::REFERER, HLTB_REFERER)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SorterError::HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    /// Reads the site's home page, follows its `_app` bundle and pulls the
    /// search key out of it.
    async fn fetch_search_key(&self, endpoint: &Url) -> Result<Option<SearchKey>> {
        let home = endpoint.join("/").map_err(|e| SorterError::InvalidConfigValueError {
            field: "lookup.endpoint".to_string(),
            value: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let html = self.get_text(home.as_str()).await?;
        let Some(script_src) = find_app_script(&html)? else {
            return Ok(None);
        };
        let script_url = home
            .join(&script_src)
            .map_err(|e| SorterError::MalformedResponseError {
                url: home.to_string(),
                message: format!("bad script reference '{}': {}", script_src, e),
            })?;

        tracing::debug!("Reading search key from {}", script_url);
        let script = self.get_text(script_url.as_str()).await?;
        extract_search_key(&script)
    }

    async fn discover_search_url(&self) -> String {
        let endpoint = match Url::parse(&self.endpoint) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                tracing::warn!("Cannot parse lookup endpoint '{}': {}", self.endpoint, e);
                return self.endpoint.clone();
            }
        };

        let discovered = match self.fetch_search_key(&endpoint).await {
            Ok(Some(key)) => key.search_url(&endpoint),
            Ok(None) => {
                tracing::warn!("No search key published, searching {} directly", self.endpoint);
                return self.endpoint.clone();
            }
            Err(e) => Err(e),
        };

        match discovered {
            Ok(url) => {
                tracing::info!("🔑 HowLongToBeat search key found, searching {}", url);
                url
            }
            Err(e) => {
                tracing::warn!(
                    "Search key discovery failed ({}), searching {} directly",
                    e,
                    self.endpoint
                );
                self.endpoint.clone()
            }
        }
    }

    /// Keyed search URL, discovered once per client.
    async fn search_url(&self) -> &str {
        self.keyed_url
            .get_or_init(|| self.discover_search_url())
            .await
    }

    async fn request_search(&self, title: &str) -> Result<Vec<Candidate>> {
        let url = self.search_url().await;
        self.pacer.until_ready().await;

        let response = self
            .client
            .post(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::REFERER, HLTB_REFERER)
            .json(&SearchRequest::for_title(title))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SorterError::HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SorterError::MalformedResponseError {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(parsed.data.into_iter().map(Candidate::from).collect())
    }
}

#[async_trait]
impl DurationLookup for HltbClient {
    async fn search(&self, title: &str) -> Result<Vec<Candidate>> {
        if title.trim().is_empty() {
            return Ok(Vec::new());
        }
        let label = format!("HowLongToBeat search for '{}'", title);
        let candidates = with_retry(&self.retry, &label, || self.request_search(title)).await?;
        tracing::debug!("'{}' -> {} candidates", title, candidates.len());
        Ok(candidates)
    }
}

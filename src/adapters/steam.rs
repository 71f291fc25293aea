use crate::domain::model::OwnedItem;
use crate::domain::ports::LibrarySource;
use crate::utils::error::{Result, SorterError};
use crate::utils::retry::{with_retry, RetryPolicy};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_STEAM_ENDPOINT: &str =
    "http://api.steampowered.com/IPlayerService/GetOwnedGames/v0001/";

/// Client for the Steam Web API `GetOwnedGames` call.
pub struct SteamLibraryClient {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl SteamLibraryClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::none(),
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

    async fn request_owned_games(&self, account_id: &str) -> Result<Vec<OwnedItem>> {
        tracing::debug!("Making Steam API request to: {} (steamid={})", self.endpoint, account_id);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("steamid", account_id),
                ("format", "json"),
                ("include_appinfo", "1"),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Steam API response status: {}", status);
        if !status.is_success() {
            return Err(SorterError::HttpStatusError {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.text().await?;
        let payload: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SorterError::MalformedResponseError {
                url: self.endpoint.clone(),
                message: e.to_string(),
            })?;

        Ok(parse_owned_games(account_id, &payload))
    }
}

/// Reads `response.games`. A payload without that list is an empty library,
/// which is what Steam sends for private profiles.
pub fn parse_owned_games(account_id: &str, payload: &serde_json::Value) -> Vec<OwnedItem> {
    match payload.pointer("/response/games").and_then(|g| g.as_array()) {
        Some(games) => games
            .iter()
            .map(|record| OwnedItem::from_record(account_id, record))
            .collect(),
        None => {
            tracing::warn!("No games data found for Steam ID: {}", account_id);
            Vec::new()
        }
    }
}

#[async_trait]
impl LibrarySource for SteamLibraryClient {
    async fn fetch_owned_items(&self, account_id: &str) -> Vec<OwnedItem> {
        let label = format!("Steam library fetch for {}", account_id);
        match with_retry(&self.retry, &label, || self.request_owned_games(account_id)).await {
            Ok(items) => items,
            Err(SorterError::HttpStatusError { status, .. }) => {
                tracing::error!("❌ Steam API returned HTTP {} for {}", status, account_id);
                Vec::new()
            }
            Err(SorterError::MalformedResponseError { message, .. }) => {
                tracing::error!("❌ Invalid JSON response for {}: {}", account_id, message);
                Vec::new()
            }
            Err(e) => {
                tracing::error!("❌ Error fetching Steam data for {}: {}", account_id, e);
                Vec::new()
            }
        }
    }
}

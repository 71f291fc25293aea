use crate::adapters::hltb::HltbClient;
use crate::adapters::steam::SteamLibraryClient;
use crate::adapters::storage::LocalStorage;
use crate::config::RunConfig;
use crate::core::aggregator::Aggregator;
use crate::core::ranker::rank;
use crate::core::report::ReportWriter;
use crate::core::resolver::DurationResolver;
use crate::core::{DurationLookup, LibrarySource, OwnedItem, Pipeline, RankedReport, Storage};
use crate::domain::model::RunSummary;
use crate::utils::error::{Result, SorterError};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fetches every configured library, resolves each game's main story time,
/// ranks the results and writes the report.
pub struct SteamPipeline<Lib, L, S>
where
    Lib: LibrarySource,
    L: DurationLookup + 'static,
    S: Storage,
{
    library: Lib,
    resolver: Arc<DurationResolver<L>>,
    writer: ReportWriter<S>,
    config: RunConfig,
}

impl<Lib, L, S> SteamPipeline<Lib, L, S>
where
    Lib: LibrarySource,
    L: DurationLookup + 'static,
    S: Storage,
{
    pub fn new(library: Lib, resolver: DurationResolver<L>, storage: S, config: RunConfig) -> Self {
        Self {
            library,
            resolver: Arc::new(resolver),
            writer: ReportWriter::new(storage),
            config,
        }
    }

    async fn resolve_sequentially(&self, items: &[OwnedItem]) -> Aggregator {
        let mut aggregator = Aggregator::new();
        for (index, item) in items.iter().enumerate() {
            let hours = self.resolver.resolve_duration(&item.name).await;
            log_resolution(index, items.len(), &item.name, hours);
            aggregator.accumulate_at(index as u64, &item.name, hours);
        }
        aggregator
    }

    /// Bounded fan-out. Sequence numbers are assigned before spawning so the
    /// aggregator ends up identical to the sequential path.
    async fn resolve_concurrently(&self, items: &[OwnedItem]) -> Result<Aggregator> {
        let aggregator = Arc::new(Mutex::new(Aggregator::new()));
        let permits = Arc::new(Semaphore::new(self.config.concurrent_requests));
        let total = items.len();
        let mut tasks = JoinSet::new();

        for (index, item) in items.iter().enumerate() {
            let permit = permits
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| SorterError::ProcessingError {
                    message: format!("lookup pool closed: {}", e),
                })?;
            let resolver = Arc::clone(&self.resolver);
            let aggregator = Arc::clone(&aggregator);
            let name = item.name.clone();

            tasks.spawn(async move {
                let hours = resolver.resolve_duration(&name).await;
                drop(permit);
                log_resolution(index, total, &name, hours);
                let mut aggregator = aggregator.lock().unwrap_or_else(|e| e.into_inner());
                aggregator.accumulate_at(index as u64, &name, hours);
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("❌ Lookup task failed: {}", e);
            }
        }

        let mut guard = aggregator.lock().unwrap_or_else(|e| e.into_inner());
        Ok(std::mem::take(&mut *guard))
    }
}

impl SteamPipeline<SteamLibraryClient, HltbClient, LocalStorage> {
    /// The production wiring: Steam Web API, HowLongToBeat and the local
    /// filesystem.
    pub fn from_config(config: RunConfig) -> Self {
        let library = SteamLibraryClient::new(&config.steam_endpoint, &config.credential)
            .with_timeout(config.steam_timeout)
            .with_retry(config.retry);
        let lookup = HltbClient::new(&config.lookup_endpoint)
            .with_timeout(config.lookup_timeout)
            .with_retry(config.retry)
            .with_min_interval(config.min_lookup_interval);
        let resolver = DurationResolver::new(lookup).with_selector(config.tie_break.build());

        Self::new(library, resolver, LocalStorage::current_dir(), config)
    }
}

fn log_resolution(index: usize, total: usize, name: &str, hours: Option<f64>) {
    match hours {
        Some(hours) => tracing::info!("[{}/{}] ✓ {}: {:.1} hours", index + 1, total, name, hours),
        None => tracing::warn!("[{}/{}] ✗ {}: No completion data found", index + 1, total, name),
    }
}

#[async_trait::async_trait]
impl<Lib, L, S> Pipeline for SteamPipeline<Lib, L, S>
where
    Lib: LibrarySource,
    L: DurationLookup + 'static,
    S: Storage,
{
    async fn extract(&self) -> Result<Vec<OwnedItem>> {
        tracing::info!("Analyzing {} Steam libraries...", self.config.account_ids.len());

        let mut items = Vec::new();
        for account_id in &self.config.account_ids {
            tracing::info!("Processing Steam library for user: {}", account_id);
            let owned = self.library.fetch_owned_items(account_id).await;
            tracing::info!("Found {} games in library", owned.len());
            items.extend(owned);
        }

        if items.is_empty() {
            tracing::warn!("No games found in any of the provided libraries!");
        }

        Ok(items)
    }

    async fn transform(&self, items: Vec<OwnedItem>) -> Result<RankedReport> {
        let started_at = Utc::now();

        let aggregator = if self.config.concurrent_requests > 1 && items.len() > 1 {
            tracing::debug!(
                "Resolving {} games with {} concurrent lookups",
                items.len(),
                self.config.concurrent_requests
            );
            self.resolve_concurrently(&items).await?
        } else {
            self.resolve_sequentially(&items).await
        };

        let unique_items = items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<HashSet<_>>()
            .len();

        let summary = RunSummary {
            accounts: self.config.account_ids.len(),
            items_fetched: items.len(),
            unique_items,
            resolved: aggregator.len(),
            total_hours: aggregator.total_hours(),
            started_at,
            finished_at: Utc::now(),
        };

        Ok(RankedReport {
            entries: rank(&aggregator),
            summary,
        })
    }

    async fn load(&self, report: RankedReport) -> Result<String> {
        self.writer
            .write_report(&self.config.output_path, &report.entries)
            .await?;

        let summary = &report.summary;
        tracing::info!("Summary:");
        tracing::info!("Total games analyzed: {}", summary.unique_items);
        tracing::info!("Games with completion data: {}", summary.resolved);
        tracing::info!("Games without data: {}", summary.unresolved());
        if let Some(average) = summary.average_hours() {
            tracing::info!("Total completion time: {:.1} hours", summary.total_hours);
            tracing::info!("Average completion time: {:.1} hours", average);
        }

        Ok(self.config.output_path.clone())
    }
}

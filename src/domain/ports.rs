use crate::domain::model::{Candidate, OwnedItem, RankedReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    /// Replaces whatever is stored at `path` with `data`.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Lists the games owned by an account.
///
/// Never fails: transport and parsing problems are logged by the
/// implementation and yield an empty library.
#[async_trait]
pub trait LibrarySource: Send + Sync {
    async fn fetch_owned_items(&self, account_id: &str) -> Vec<OwnedItem>;
}

/// Searches a completion-time database by title.
#[async_trait]
pub trait DurationLookup: Send + Sync {
    async fn search(&self, title: &str) -> Result<Vec<Candidate>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<OwnedItem>>;
    async fn transform(&self, items: Vec<OwnedItem>) -> Result<RankedReport>;
    async fn load(&self, report: RankedReport) -> Result<String>;
}

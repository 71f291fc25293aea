use crate::core::selector::{FirstResult, MatchSelector};
use crate::domain::model::Hours;
use crate::domain::ports::DurationLookup;

/// Turns a game title into a main story estimate.
pub struct DurationResolver<L: DurationLookup> {
    lookup: L,
    selector: Box<dyn MatchSelector>,
}

impl<L: DurationLookup> DurationResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            selector: Box::new(FirstResult),
        }
    }

    pub fn with_selector(mut self, selector: Box<dyn MatchSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// `None` means "leave this game out of the ranking": no hit, no main
    /// story data on the picked hit, or a failed lookup.
    pub async fn resolve_duration(&self, item_name: &str) -> Option<Hours> {
        let candidates = match self.lookup.search(item_name).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Error getting completion time for '{}': {}", item_name, e);
                return None;
            }
        };

        if candidates.is_empty() {
            tracing::debug!("No lookup results for '{}'", item_name);
            return None;
        }

        let index = self.selector.select(item_name, &candidates)?;
        let picked = candidates.get(index)?;

        if candidates.len() > 1 {
            tracing::warn!(
                "⚠️ '{}' matched {} games, {} picked '{}'",
                item_name,
                candidates.len(),
                self.selector.name(),
                picked.title
            );
        }

        picked.main_story_hours.filter(|hours| *hours > 0.0)
    }
}

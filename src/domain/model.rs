use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name used when the inventory service omits a game's title.
pub const UNKNOWN_ITEM_NAME: &str = "N/A";

/// Estimated hours to finish a game's main story.
pub type Hours = f64;

/// One game as listed by the inventory service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedItem {
    pub account_id: String,
    pub name: String,
    pub raw_metadata: serde_json::Map<String, serde_json::Value>,
}

impl OwnedItem {
    pub fn new(account_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            name: name.into(),
            raw_metadata: serde_json::Map::new(),
        }
    }

    /// Builds an item from a raw game record. Records that are not JSON
    /// objects carry no metadata and fall back to the unknown name.
    pub fn from_record(account_id: &str, record: &serde_json::Value) -> Self {
        let raw_metadata = record.as_object().cloned().unwrap_or_default();
        let name = raw_metadata
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or(UNKNOWN_ITEM_NAME)
            .to_string();

        Self {
            account_id: account_id.to_string(),
            name,
            raw_metadata,
        }
    }
}

/// A search hit returned by the duration lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    pub title: String,
    /// `None` when the service has no main story time for this game.
    pub main_story_hours: Option<Hours>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub hours: Hours,
}

impl RankedEntry {
    pub fn new(name: impl Into<String>, hours: Hours) -> Self {
        Self {
            name: name.into(),
            hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub accounts: usize,
    pub items_fetched: usize,
    pub unique_items: usize,
    pub resolved: usize,
    pub total_hours: Hours,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn unresolved(&self) -> usize {
        self.unique_items.saturating_sub(self.resolved)
    }

    pub fn average_hours(&self) -> Option<Hours> {
        if self.resolved == 0 {
            None
        } else {
            Some(self.total_hours / self.resolved as f64)
        }
    }
}

/// Output of the transform phase: the ranking plus what it took to build it.
#[derive(Debug, Clone)]
pub struct RankedReport {
    pub entries: Vec<RankedEntry>,
    pub summary: RunSummary,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output_path: String,
    pub summary: RunSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_from_record_keeps_metadata() {
        let record = serde_json::json!({"appid": 620, "name": "Portal 2", "playtime_forever": 1337});
        let item = OwnedItem::from_record("42", &record);

        assert_eq!(item.account_id, "42");
        assert_eq!(item.name, "Portal 2");
        assert_eq!(item.raw_metadata.get("appid").unwrap().as_u64().unwrap(), 620);
    }

    #[test]
    fn test_item_without_name_defaults() {
        let record = serde_json::json!({"appid": 10});
        let item = OwnedItem::from_record("42", &record);

        assert_eq!(item.name, UNKNOWN_ITEM_NAME);
    }

    #[test]
    fn test_summary_average() {
        let now = Utc::now();
        let summary = RunSummary {
            accounts: 1,
            items_fetched: 4,
            unique_items: 3,
            resolved: 2,
            total_hours: 9.0,
            started_at: now,
            finished_at: now,
        };

        assert_eq!(summary.unresolved(), 1);
        assert_eq!(summary.average_hours(), Some(4.5));
    }
}

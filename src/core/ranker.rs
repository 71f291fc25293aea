use crate::core::aggregator::Aggregator;
use crate::domain::model::{Hours, RankedEntry};

/// Shortest games first. Equal durations keep the aggregator's insertion
/// order since `sort_by` is stable.
pub fn rank(aggregator: &Aggregator) -> Vec<RankedEntry> {
    rank_entries(aggregator.in_insertion_order())
}

pub fn rank_entries(entries: Vec<(String, Hours)>) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = entries
        .into_iter()
        .map(|(name, hours)| RankedEntry::new(name, hours))
        .collect();
    ranked.sort_by(|a, b| a.hours.total_cmp(&b.hours));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ranked: &[RankedEntry]) -> Vec<&str> {
        ranked.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_rank_ascending() {
        let mut aggregator = Aggregator::new();
        aggregator.accumulate("Long", Some(40.0));
        aggregator.accumulate("Short", Some(2.5));
        aggregator.accumulate("Medium", Some(11.0));

        let ranked = rank(&aggregator);

        assert_eq!(names(&ranked), vec!["Short", "Medium", "Long"]);
        assert!(ranked.windows(2).all(|w| w[0].hours <= w[1].hours));
    }

    #[test]
    fn test_rank_ties_keep_insertion_order() {
        let mut aggregator = Aggregator::new();
        aggregator.accumulate("C", Some(5.0));
        aggregator.accumulate("A", Some(2.0));
        aggregator.accumulate("Z", Some(2.0));
        aggregator.accumulate("B", Some(2.0));

        let ranked = rank(&aggregator);

        assert_eq!(names(&ranked), vec!["A", "Z", "B", "C"]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&Aggregator::new()).is_empty());
    }
}

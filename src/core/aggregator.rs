use crate::domain::model::Hours;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct Slot {
    hours: Hours,
    /// Sequence of the first event that stored a duration; orders ties.
    first_seq: u64,
    /// Sequence of the event whose duration is currently stored.
    last_seq: u64,
}

/// Merges per-item durations from every account into one mapping keyed by
/// game name.
///
/// Every event carries a sequence number in enumeration order (accounts in
/// configured order, then items in library order). A later sequence always
/// wins a name collision, whatever order the events arrive in, and an item
/// keeps the position of its first stored duration. Absent durations never
/// create an entry.
#[derive(Debug, Default)]
pub struct Aggregator {
    entries: HashMap<String, Slot>,
    next_seq: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the next event in sequence.
    pub fn accumulate(&mut self, item_name: &str, hours: Option<Hours>) {
        let seq = self.next_seq;
        self.accumulate_at(seq, item_name, hours);
    }

    /// Records an event whose sequence number was assigned up front, as the
    /// concurrent lookup path does.
    pub fn accumulate_at(&mut self, seq: u64, item_name: &str, hours: Option<Hours>) {
        self.next_seq = self.next_seq.max(seq + 1);

        let Some(hours) = hours else {
            return;
        };

        match self.entries.get_mut(item_name) {
            Some(slot) => {
                if seq >= slot.last_seq {
                    slot.hours = hours;
                    slot.last_seq = seq;
                }
                slot.first_seq = slot.first_seq.min(seq);
            }
            None => {
                self.entries.insert(
                    item_name.to_string(),
                    Slot {
                        hours,
                        first_seq: seq,
                        last_seq: seq,
                    },
                );
            }
        }
    }

    pub fn get(&self, item_name: &str) -> Option<Hours> {
        self.entries.get(item_name).map(|slot| slot.hours)
    }

    pub fn contains(&self, item_name: &str) -> bool {
        self.entries.contains_key(item_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_hours(&self) -> Hours {
        self.entries.values().map(|slot| slot.hours).sum()
    }

    /// Entries in the order their first duration was stored.
    pub fn in_insertion_order(&self) -> Vec<(String, Hours)> {
        let mut ordered: Vec<(&String, &Slot)> = self.entries.iter().collect();
        ordered.sort_by_key(|(_, slot)| slot.first_seq);
        ordered
            .into_iter()
            .map(|(name, slot)| (name.clone(), slot.hours))
            .collect()
    }
}

use std::collections::{HashMap, VecDeque};

use super::types::MemoryRecord;

/// Record storage behind the manager: a bounded recent window plus an
/// unbounded durable map keyed by record id.
///
/// The recent window is strict FIFO. The durable map never evicts; it grows
/// for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    recent: VecDeque<MemoryRecord>,
    durable: HashMap<String, MemoryRecord>,
    capacity: usize,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            recent: VecDeque::new(),
            durable: HashMap::new(),
            capacity,
        }
    }

    /// Push into the recent window, dropping the oldest entry past capacity,
    /// and insert or overwrite the durable entry under `record.id`.
    pub fn append(&mut self, record: MemoryRecord) {
        self.durable.insert(record.id.clone(), record.clone());
        self.recent.push_back(record);
        while self.recent.len() > self.capacity {
            self.recent.pop_front();
        }
    }

    /// Durable lookup. `None` means the id was never stored here.
    pub fn get(&self, id: &str) -> Option<&MemoryRecord> {
        self.durable.get(id)
    }

    /// Recent window, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.recent.iter()
    }

    pub fn recent_len(&self) -> usize {
        self.recent.len()
    }

    /// Number of distinct ids in the durable map.
    pub fn len(&self) -> usize {
        self.durable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durable.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::{MemoryKind, Metadata};
    use chrono::Utc;

    fn record(id: &str, text: &str) -> MemoryRecord {
        MemoryRecord {
            id: id.into(),
            text: text.into(),
            kind: MemoryKind::Interaction,
            emotional_context: "neutral".into(),
            created_at: Utc::now(),
            metadata: Metadata::new(),
        }
    }

    fn recent_texts(store: &MemoryStore) -> Vec<String> {
        store.recent().map(|r| r.text.clone()).collect()
    }

    #[test]
    fn window_keeps_last_records_in_order() {
        for capacity in 1..=5 {
            for n in 0usize..=8 {
                let mut store = MemoryStore::new(capacity);
                for i in 0..n {
                    store.append(record(&format!("id-{i}"), &format!("t{i}")));
                }
                let expected: Vec<String> = (n.saturating_sub(capacity)..n)
                    .map(|i| format!("t{i}"))
                    .collect();
                assert_eq!(store.recent_len(), n.min(capacity));
                assert_eq!(recent_texts(&store), expected, "capacity={capacity} n={n}");
                assert_eq!(store.len(), n);
            }
        }
    }

    #[test]
    fn durable_map_survives_window_eviction() {
        let mut store = MemoryStore::new(1);
        store.append(record("a", "first"));
        store.append(record("b", "second"));

        assert_eq!(recent_texts(&store), ["second"]);
        assert_eq!(store.get("a").map(|r| r.text.as_str()), Some("first"));
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn same_id_overwrites_durable_but_not_window() {
        let mut store = MemoryStore::new(4);
        store.append(record("dup", "one"));
        store.append(record("dup", "two"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("dup").map(|r| r.text.as_str()), Some("two"));
        assert_eq!(recent_texts(&store), ["one", "two"]);
    }

    #[test]
    fn huge_capacity_allocates_lazily() {
        let mut store = MemoryStore::new(usize::MAX);
        store.append(record("a", "first"));
        store.append(record("b", "second"));
        assert_eq!(recent_texts(&store), ["first", "second"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn zero_capacity_keeps_no_window() {
        let mut store = MemoryStore::new(0);
        store.append(record("a", "first"));
        assert_eq!(store.recent_len(), 0);
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}

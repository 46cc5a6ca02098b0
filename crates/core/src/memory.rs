//! Bounded memory store — classified notes from a single run.
//!
//! The store is a most-recent-first ring: insertion always places the new
//! entry at the head, and once the store holds [`MEMORY_CAPACITY`] entries
//! the oldest is dropped from the tail. There is no update or delete —
//! memory is append/evict only, cleared at run start.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of entries the store will hold.
pub const MEMORY_CAPACITY: usize = 10;

/// The classification of a stored note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryKind {
    /// Working context for the current exchange
    ShortTerm,
    /// Durable knowledge worth recalling for similar tasks
    LongTerm,
    /// A record of something that happened during the run
    Episodic,
}

/// A single classified memory entry. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Run-unique entry ID
    pub id: String,

    /// Classification
    pub kind: MemoryKind,

    /// The note payload
    pub data: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

/// The bounded most-recent-first memory store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    entries: VecDeque<MemoryEntry>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a classified note at the head, evicting the tail entry when
    /// the store is full. Returns the new entry's ID.
    pub fn insert(&mut self, kind: MemoryKind, data: impl Into<String>) -> String {
        let entry = MemoryEntry {
            id: Uuid::new_v4().to_string(),
            kind,
            data: data.into(),
            timestamp: Utc::now(),
        };
        let id = entry.id.clone();
        self.entries.push_front(entry);
        self.entries.truncate(MEMORY_CAPACITY);
        debug_assert!(self.entries.len() <= MEMORY_CAPACITY);
        id
    }

    /// Entries in most-recent-first order.
    pub fn entries(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.entries.iter()
    }

    /// The most recently inserted entry.
    pub fn head(&self) -> Option<&MemoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_places_entry_at_head() {
        let mut store = MemoryStore::new();
        store.insert(MemoryKind::ShortTerm, "first");
        store.insert(MemoryKind::LongTerm, "second");

        assert_eq!(store.len(), 2);
        assert_eq!(store.head().unwrap().data, "second");
        let collected: Vec<_> = store.entries().map(|e| e.data.as_str()).collect();
        assert_eq!(collected, vec!["second", "first"]);
    }

    #[test]
    fn eleventh_insert_evicts_oldest() {
        let mut store = MemoryStore::new();
        for i in 0..MEMORY_CAPACITY {
            store.insert(MemoryKind::Episodic, format!("note {i}"));
        }
        assert_eq!(store.len(), MEMORY_CAPACITY);

        store.insert(MemoryKind::ShortTerm, "overflow");
        assert_eq!(store.len(), MEMORY_CAPACITY);
        assert_eq!(store.head().unwrap().data, "overflow");
        // "note 0" was the first inserted among the ten — it is gone
        assert!(store.entries().all(|e| e.data != "note 0"));
        assert!(store.entries().any(|e| e.data == "note 1"));
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut store = MemoryStore::new();
        for i in 0..50 {
            store.insert(MemoryKind::LongTerm, format!("{i}"));
            assert!(store.len() <= MEMORY_CAPACITY);
        }
    }

    #[test]
    fn clear_empties_store() {
        let mut store = MemoryStore::new();
        store.insert(MemoryKind::ShortTerm, "note");
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn insert_returns_entry_id() {
        let mut store = MemoryStore::new();
        let id = store.insert(MemoryKind::LongTerm, "keyed");
        assert_eq!(store.head().unwrap().id, id);
    }

    #[test]
    fn kind_serialization_is_kebab_case() {
        let json = serde_json::to_string(&MemoryKind::ShortTerm).unwrap();
        assert_eq!(json, "\"short-term\"");
        let kind: MemoryKind = serde_json::from_str("\"long-term\"").unwrap();
        assert_eq!(kind, MemoryKind::LongTerm);
    }
}

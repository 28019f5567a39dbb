//! Override store — the single source of truth for "what FOV should this
//! player see".
//!
//! Keyed by [`Slot`]. Each operation is one atomic replace-or-remove on one
//! key, so operations on the same slot linearize and a slot never holds more
//! than one record. Operations on different slots are independent.
//!
//! Slots are reused across connections: the disconnect path must call
//! [`OverrideStore::clear`] before the seat is handed to someone else.

use dashmap::DashMap;

use crate::types::{Fov, ItemId, ItemKey, MAX_SLOTS, Slot};

/// The active override for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRecord {
    /// FOV the player should see.
    pub fov: Fov,
    /// Catalog key of the item that granted it.
    pub source_item_key: ItemKey,
    /// Shop id of that item, kept for diagnostics.
    pub source_item_id: ItemId,
}

impl OverrideRecord {
    /// Create a record.
    #[must_use]
    pub fn new(fov: Fov, source_item_key: ItemKey, source_item_id: ItemId) -> Self {
        Self {
            fov,
            source_item_key,
            source_item_id,
        }
    }
}

/// Concurrency-safe slot → override mapping.
#[derive(Debug)]
pub struct OverrideStore {
    records: DashMap<Slot, OverrideRecord>,
}

impl OverrideStore {
    /// Create an empty store sized for [`MAX_SLOTS`] seats.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::with_capacity(MAX_SLOTS),
        }
    }

    /// Install `record` for `slot`, replacing whatever was there.
    ///
    /// Returns the replaced record, if any. The latest install always wins;
    /// records never stack.
    pub fn install(&self, slot: Slot, record: OverrideRecord) -> Option<OverrideRecord> {
        self.records.insert(slot, record)
    }

    /// Remove the override for `slot`. Returns the removed record, if any.
    pub fn clear(&self, slot: Slot) -> Option<OverrideRecord> {
        self.records.remove(&slot).map(|(_, record)| record)
    }

    /// A copy of the override for `slot`.
    ///
    /// Returned by value so no shard lock is held while the caller talks to
    /// the host.
    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<OverrideRecord> {
        self.records.get(&slot).map(|entry| entry.value().clone())
    }

    /// FOV override for `slot`, if any.
    #[must_use]
    pub fn fov(&self, slot: Slot) -> Option<Fov> {
        self.records.get(&slot).map(|entry| entry.value().fov)
    }

    /// Whether `slot` currently has an override.
    #[must_use]
    pub fn contains(&self, slot: Slot) -> bool {
        self.records.contains_key(&slot)
    }

    /// Number of slots with an active override.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no slot has an override.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Slots with an active override, ascending.
    #[must_use]
    pub fn slots(&self) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self.records.iter().map(|entry| *entry.key()).collect();
        slots.sort_unstable();
        slots
    }
}

impl Default for OverrideStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn record(fov: u32, key: &str) -> OverrideRecord {
        OverrideRecord::new(Fov(fov), ItemKey::new(key), ItemId(1))
    }

    #[test]
    fn install_replaces_previous_record() {
        let store = OverrideStore::new();
        assert!(store.install(Slot(3), record(60, "zoom")).is_none());

        let replaced = store.install(Slot(3), record(120, "wide"));
        assert_eq!(replaced.map(|r| r.fov), Some(Fov(60)));

        assert_eq!(store.len(), 1);
        let current = store.get(Slot(3)).expect("record");
        assert_eq!(current.fov, Fov(120));
        assert_eq!(current.source_item_key.as_str(), "wide");
    }

    #[test]
    fn clear_removes_only_that_slot() {
        let store = OverrideStore::new();
        store.install(Slot(1), record(60, "zoom"));
        store.install(Slot(2), record(120, "wide"));

        assert_eq!(store.clear(Slot(1)).map(|r| r.fov), Some(Fov(60)));
        assert!(!store.contains(Slot(1)));
        assert_eq!(store.fov(Slot(2)), Some(Fov(120)));
    }

    #[test]
    fn clearing_an_empty_slot_is_harmless() {
        let store = OverrideStore::new();
        assert!(store.clear(Slot(9)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn slots_are_sorted() {
        let store = OverrideStore::new();
        for s in [5, 1, 3] {
            store.install(Slot(s), record(100, "x"));
        }
        assert_eq!(store.slots(), vec![Slot(1), Slot(3), Slot(5)]);
    }

    #[test]
    fn concurrent_install_and_clear_leave_at_most_one_record() {
        let store = Arc::new(OverrideStore::new());
        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..500u32 {
                        let slot = Slot(i % 4);
                        if (i + t) % 3 == 0 {
                            store.clear(slot);
                        } else {
                            store.install(slot, record(60 + t, "x"));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker panicked");
        }

        assert!(store.len() <= 4);
        for slot in store.slots() {
            assert!(slot.0 < 4);
        }
    }
}

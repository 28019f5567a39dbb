//! Property-based tests for the override store.
//!
//! Random sequences of installs and clears are replayed against the store and
//! against a plain `HashMap` model; the two must always agree.

use std::collections::HashMap;

use proptest::prelude::*;

use fovshop_core::store::{OverrideRecord, OverrideStore};
use fovshop_core::types::{Fov, ItemId, ItemKey, Slot};

#[derive(Debug, Clone)]
enum Op {
    Install { slot: u32, fov: u32 },
    Clear { slot: u32 },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..8u32, 1..180u32).prop_map(|(slot, fov)| Op::Install { slot, fov }),
        1 => (0..8u32).prop_map(|slot| Op::Clear { slot }),
    ]
}

fn record(fov: u32) -> OverrideRecord {
    OverrideRecord::new(Fov(fov), ItemKey::new(format!("fov_{fov}")), ItemId(fov as i32))
}

// ---------------------------------------------------------------------------
// Property: store matches a last-write-wins model
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn store_matches_last_write_wins_model(ops in prop::collection::vec(arb_op(), 0..200)) {
        let store = OverrideStore::new();
        let mut model: HashMap<u32, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Install { slot, fov } => {
                    store.install(Slot(slot), record(fov));
                    model.insert(slot, fov);
                }
                Op::Clear { slot } => {
                    store.clear(Slot(slot));
                    model.remove(&slot);
                }
            }
        }

        prop_assert_eq!(store.len(), model.len());
        for slot in 0..8u32 {
            prop_assert_eq!(store.fov(Slot(slot)).map(Fov::get), model.get(&slot).copied());
        }
    }
}

// ---------------------------------------------------------------------------
// Property: clear always leaves the slot empty
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn clear_always_empties_slot(
        ops in prop::collection::vec(arb_op(), 0..100),
        target in 0..8u32,
    ) {
        let store = OverrideStore::new();
        for op in ops {
            match op {
                Op::Install { slot, fov } => { store.install(Slot(slot), record(fov)); }
                Op::Clear { slot } => { store.clear(Slot(slot)); }
            }
        }

        store.clear(Slot(target));
        prop_assert!(!store.contains(Slot(target)));
        prop_assert!(store.get(Slot(target)).is_none());
    }
}

// ---------------------------------------------------------------------------
// Property: repeated installs on one slot never stack
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn repeated_installs_keep_one_record(fovs in prop::collection::vec(1..180u32, 1..50)) {
        let store = OverrideStore::new();
        for &fov in &fovs {
            store.install(Slot(0), record(fov));
        }

        prop_assert_eq!(store.len(), 1);
        let last = *fovs.last().expect("non-empty");
        let current = store.get(Slot(0)).expect("present");
        prop_assert_eq!(current.fov, Fov(last));
        prop_assert_eq!(current.source_item_key.as_str(), format!("fov_{last}"));
    }
}

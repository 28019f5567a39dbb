//! Apply engine — pushes the FOV a player should currently see.
//!
//! Reads the override store for the player's slot, falls back to the catalog's
//! no-op value, writes the attribute and invalidates it. Idempotent: repeated
//! calls without a state change push the same value again.
//!
//! Every store change that is followed by a push goes through
//! [`ApplyEngine::update`], which holds the slot's lock across the change, the
//! read and the push. Two callbacks racing on one slot therefore leave the
//! attribute matching the store.

use std::sync::Arc;

use fovshop_core::metrics::FovShopCounters;
use fovshop_core::store::OverrideStore;
use fovshop_core::types::{Fov, MAX_SLOTS, Slot};
use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

use crate::host::{FOV_ATTRIBUTE, PlayerAttributes, PlayerHandle};

/// Computes and pushes visible FOV values.
pub struct ApplyEngine {
    store: Arc<OverrideStore>,
    attributes: Arc<dyn PlayerAttributes>,
    counters: Arc<FovShopCounters>,
    default_fov: Fov,
    slot_locks: Box<[Mutex<()>]>,
}

impl ApplyEngine {
    /// Create an engine over `store`, pushing through `attributes`.
    #[must_use]
    pub fn new(
        store: Arc<OverrideStore>,
        attributes: Arc<dyn PlayerAttributes>,
        counters: Arc<FovShopCounters>,
        default_fov: Fov,
    ) -> Self {
        Self {
            store,
            attributes,
            counters,
            default_fov,
            slot_locks: (0..MAX_SLOTS).map(|_| Mutex::new(())).collect(),
        }
    }

    /// The FOV `slot` should see right now, without pushing anything.
    #[must_use]
    pub fn visible_fov(&self, slot: Slot) -> Fov {
        self.store.fov(slot).unwrap_or(self.default_fov)
    }

    /// Push the current FOV for `player` and force replication.
    ///
    /// Returns the value pushed. Player validity is the caller's concern.
    pub fn apply(&self, player: &PlayerHandle) -> Fov {
        let _slot = self.lock(player.slot);
        self.push(player)
    }

    /// Change the store for `player`'s slot, then push the result, as one
    /// step with respect to every other change or push on that slot.
    pub fn update<T>(&self, player: &PlayerHandle, change: impl FnOnce(&OverrideStore) -> T) -> (T, Fov) {
        let _slot = self.lock(player.slot);
        let changed = change(&self.store);
        (changed, self.push(player))
    }

    /// Change the store for `slot` without pushing anything, serialized with
    /// pushes on that slot.
    pub fn with_slot<T>(&self, slot: Slot, change: impl FnOnce(&OverrideStore) -> T) -> T {
        let _slot = self.lock(slot);
        change(&self.store)
    }

    /// The no-op value pushed when a slot has no override.
    #[must_use]
    pub fn default_fov(&self) -> Fov {
        self.default_fov
    }

    fn lock(&self, slot: Slot) -> MutexGuard<'_, ()> {
        self.slot_locks[slot.0 as usize % self.slot_locks.len()].lock()
    }

    fn push(&self, player: &PlayerHandle) -> Fov {
        let fov = self.visible_fov(player.slot);
        self.attributes.set_desired_fov(player, fov);
        self.attributes.mark_attribute_dirty(player, FOV_ATTRIBUTE);
        FovShopCounters::bump(&self.counters.applies);
        trace!(slot = %player.slot, fov = %fov, "FOV applied");
        fov
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::AttributeRef;
    use fovshop_core::store::OverrideRecord;
    use fovshop_core::types::{ItemId, ItemKey};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl PlayerAttributes for Recorder {
        fn set_desired_fov(&self, player: &PlayerHandle, fov: Fov) {
            self.calls.lock().push(format!("set {} {}", player.slot, fov.get()));
        }

        fn mark_attribute_dirty(&self, player: &PlayerHandle, attribute: AttributeRef) {
            self.calls.lock().push(format!("dirty {} {}", player.slot, attribute.field_name));
        }
    }

    fn engine() -> (ApplyEngine, Arc<OverrideStore>, Arc<Recorder>) {
        let store = Arc::new(OverrideStore::new());
        let recorder = Arc::new(Recorder::default());
        let engine = ApplyEngine::new(
            Arc::clone(&store),
            recorder.clone(),
            Arc::new(FovShopCounters::new()),
            Fov::DEFAULT,
        );
        (engine, store, recorder)
    }

    #[test]
    fn no_override_pushes_default_then_invalidates() {
        let (engine, _store, recorder) = engine();
        let fov = engine.apply(&PlayerHandle::connected(2));

        assert_eq!(fov, Fov(90));
        assert_eq!(*recorder.calls.lock(), vec!["set 2 90", "dirty 2 m_iDesiredFOV"]);
    }

    #[test]
    fn override_is_pushed() {
        let (engine, store, _recorder) = engine();
        store.install(Slot(2), OverrideRecord::new(Fov(110), ItemKey::new("wide"), ItemId(3)));

        assert_eq!(engine.apply(&PlayerHandle::connected(2)), Fov(110));
    }

    #[test]
    fn apply_is_idempotent() {
        let (engine, store, recorder) = engine();
        store.install(Slot(0), OverrideRecord::new(Fov(75), ItemKey::new("zoom"), ItemId(1)));
        let player = PlayerHandle::connected(0);

        let first = engine.apply(&player);
        let second = engine.apply(&player);

        assert_eq!(first, second);
        let calls = recorder.calls.lock();
        assert_eq!(calls[0], calls[2]);
        assert_eq!(calls[1], calls[3]);
    }

    #[test]
    fn update_pushes_the_changed_state() {
        let (engine, store, recorder) = engine();
        let player = PlayerHandle::connected(4);

        let (previous, fov) = engine.update(&player, |store| {
            store.install(Slot(4), OverrideRecord::new(Fov(60), ItemKey::new("zoom"), ItemId(1)))
        });
        assert!(previous.is_none());
        assert_eq!(fov, Fov(60));

        let (removed, fov) = engine.update(&player, |store| store.clear(Slot(4)));
        assert!(removed.is_some());
        assert_eq!(fov, Fov::DEFAULT);
        assert!(store.is_empty());
        assert_eq!(recorder.calls.lock().last().map(String::as_str), Some("dirty 4 m_iDesiredFOV"));
    }

    #[test]
    fn slots_beyond_the_seat_count_still_lock() {
        let (engine, store, _recorder) = engine();
        let far = u32::try_from(MAX_SLOTS).expect("fits") * 3 + 1;
        store.install(Slot(far), OverrideRecord::new(Fov(70), ItemKey::new("zoom"), ItemId(1)));

        assert_eq!(engine.apply(&PlayerHandle::connected(far)), Fov(70));
        assert!(engine.with_slot(Slot(far), |store| store.clear(Slot(far))).is_some());
    }
}

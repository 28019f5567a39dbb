//! Lifecycle adapter — reasserts overrides on spawn and clears them on
//! disconnect.
//!
//! The engine resets the desired-FOV attribute on every spawn, so the
//! override has to be pushed again each life. Disconnect clears the slot
//! unconditionally so the next occupant of the seat starts at the default.

use std::sync::Arc;

use fovshop_core::error::HandlerRejection;
use fovshop_core::metrics::FovShopCounters;
use fovshop_core::store::OverrideRecord;
use fovshop_core::types::{Fov, Slot};
use tracing::debug;

use crate::apply::ApplyEngine;
use crate::host::{LifecycleBus, PlayerHandle};

/// Drives the apply engine and the store from spawn/disconnect events.
pub struct LifecycleAdapter {
    apply: Arc<ApplyEngine>,
    counters: Arc<FovShopCounters>,
}

impl LifecycleAdapter {
    /// Create an adapter pushing through `apply`.
    #[must_use]
    pub fn new(apply: Arc<ApplyEngine>, counters: Arc<FovShopCounters>) -> Self {
        Self { apply, counters }
    }

    /// Register spawn and disconnect handlers on the bus. Nothing else is
    /// subscribed.
    pub fn subscribe(self: &Arc<Self>, bus: &dyn LifecycleBus) {
        let spawn = Arc::clone(self);
        bus.on_player_spawn(Arc::new(move |player: &PlayerHandle| {
            let _ = spawn.on_player_spawn(player);
        }));

        let disconnect = Arc::clone(self);
        bus.on_client_disconnect(Arc::new(move |slot: Slot| {
            disconnect.on_client_disconnect(slot);
        }));
    }

    /// A player spawned: push whatever FOV their slot should see.
    ///
    /// # Errors
    /// `InvalidPlayer` for bots and handles that are not fully connected.
    pub fn on_player_spawn(&self, player: &PlayerHandle) -> Result<Fov, HandlerRejection> {
        if let Err(rejection) = player.ensure_eligible() {
            FovShopCounters::bump(&self.counters.invalid_player_rejections);
            debug!(slot = %player.slot, bot = player.is_bot, "Skipping FOV reapply for invalid player");
            return Err(rejection);
        }
        Ok(self.apply.apply(player))
    }

    /// A client left `slot`: drop its override, whatever state it was in.
    ///
    /// Returns the removed record, if there was one.
    pub fn on_client_disconnect(&self, slot: Slot) -> Option<OverrideRecord> {
        let removed = self.apply.with_slot(slot, |store| store.clear(slot));
        if let Some(record) = &removed {
            FovShopCounters::bump(&self.counters.disconnect_clears);
            debug!(slot = %slot, key = %record.source_item_key, "Override cleared on disconnect");
        }
        removed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Shop bridge — registers the catalog with the shop service and turns its
//! bought/sold/toggled callbacks into override store transitions.
//!
//! Per slot there are two states:
//!
//! ```text
//!            bought / toggled(on)            bought / toggled(on)
//!   Default ───────────────────▶ Overridden ◀──────────────────┐
//!      ▲                            │   └──────────────────────┘
//!      └────────────────────────────┘        (record replaced)
//!          sold / toggled(off) / disconnect
//! ```
//!
//! A toggle is only a re-entry point into the two transitions: on is a
//! purchase, off is a sale, and nothing about the original transaction is
//! consulted.

use std::collections::HashMap;
use std::sync::Arc;

use fovshop_core::catalog::Catalog;
use fovshop_core::error::{HandlerRejection, RegistrationError};
use fovshop_core::metrics::FovShopCounters;
use fovshop_core::store::OverrideRecord;
use fovshop_core::types::{Fov, ItemId, ItemKey, ToggleState};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::apply::ApplyEngine;
use crate::host::{ItemCallbacks, PlayerHandle, PurchaseEcho, ShopService};

/// Outcome of [`ShopBridge::register_all`].
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// Items the shop accepted, in registration order.
    pub registered: Vec<(ItemKey, ItemId)>,
    /// Items the shop refused.
    pub skipped: Vec<(ItemKey, RegistrationError)>,
}

impl RegistrationReport {
    /// Whether every catalog item registered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Translates shop callbacks into override store mutations.
pub struct ShopBridge {
    catalog: Arc<Catalog>,
    apply: Arc<ApplyEngine>,
    counters: Arc<FovShopCounters>,
    category: String,
    /// Shop id → catalog key, filled at registration.
    registered: RwLock<HashMap<ItemId, ItemKey>>,
}

impl ShopBridge {
    /// Create a bridge registering under `category`.
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        apply: Arc<ApplyEngine>,
        counters: Arc<FovShopCounters>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            apply,
            counters,
            category: category.into(),
            registered: RwLock::new(HashMap::new()),
        }
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register every catalog item, lowest FOV first, one at a time.
    ///
    /// Each registration is awaited before the next starts. An item the shop
    /// refuses is logged and skipped; the rest still register.
    pub async fn register_all(self: &Arc<Self>, shop: &dyn ShopService) -> RegistrationReport {
        let mut report = RegistrationReport::default();

        for item in self.catalog.iter() {
            match shop.register_item(&self.category, item).await {
                Ok(item_id) => {
                    self.registered.write().insert(item_id, item.key.clone());
                    shop.set_callbacks(item_id, self.callbacks());
                    debug!(key = %item.key, id = %item_id, fov = %item.fov, "Item registered");
                    report.registered.push((item.key.clone(), item_id));
                }
                Err(err) => {
                    FovShopCounters::bump(&self.counters.registration_failures);
                    warn!(key = %item.key, error = %err, "Item registration failed; skipping");
                    report.skipped.push((item.key.clone(), err));
                }
            }
        }

        info!(
            category = %self.category,
            registered = report.registered.len(),
            skipped = report.skipped.len(),
            "FOV items registered"
        );
        report
    }

    /// The callback set handed to the shop for each registered item.
    ///
    /// Rejections are already logged and counted by the handlers, so the
    /// hooks drop them.
    #[must_use]
    pub fn callbacks(self: &Arc<Self>) -> ItemCallbacks {
        let bought = Arc::clone(self);
        let sold = Arc::clone(self);
        let toggled = Arc::clone(self);
        ItemCallbacks {
            on_bought: Arc::new(move |player: &PlayerHandle, item_id: ItemId, key: &str, echo: PurchaseEcho| {
                let _ = bought.on_bought(player, item_id, key, echo);
            }),
            on_sold: Arc::new(move |player: &PlayerHandle, item_id: ItemId, key: &str, _sell_price: i32| {
                let _ = sold.on_sold(player, item_id, key);
            }),
            on_toggled: Arc::new(move |player: &PlayerHandle, item_id: ItemId, key: &str, state: i32| {
                let _ = toggled.on_toggled(player, item_id, key, state);
            }),
        }
    }

    /// Catalog key registered under `item_id`, if any.
    #[must_use]
    pub fn item_key(&self, item_id: ItemId) -> Option<ItemKey> {
        self.registered.read().get(&item_id).cloned()
    }

    /// All registered items, ordered by shop id.
    #[must_use]
    pub fn registered_items(&self) -> Vec<(ItemId, ItemKey)> {
        let mut items: Vec<_> = self
            .registered
            .read()
            .iter()
            .map(|(id, key)| (*id, key.clone()))
            .collect();
        items.sort_by_key(|(id, _)| *id);
        items
    }

    // -----------------------------------------------------------------------
    // Callbacks
    // -----------------------------------------------------------------------

    /// A player bought `item_key`: install its override and apply it now.
    ///
    /// # Errors
    /// `InvalidPlayer` for ineligible handles, `UnknownItem` for keys the
    /// catalog does not know. Neither touches the store.
    pub fn on_bought(
        &self,
        player: &PlayerHandle,
        item_id: ItemId,
        item_key: &str,
        echo: PurchaseEcho,
    ) -> Result<Fov, HandlerRejection> {
        self.guard(player)?;
        let fov = self.grant(player, item_id, item_key)?;
        FovShopCounters::bump(&self.counters.purchases);
        debug!(slot = %player.slot, key = item_key, price = echo.buy_price, fov = %fov, "FOV item bought");
        Ok(fov)
    }

    /// A player sold an item: drop whatever override the slot has and reset.
    ///
    /// # Errors
    /// `InvalidPlayer` for ineligible handles.
    pub fn on_sold(&self, player: &PlayerHandle, item_id: ItemId, item_key: &str) -> Result<Fov, HandlerRejection> {
        self.guard(player)?;
        let fov = self.revoke(player);
        FovShopCounters::bump(&self.counters.sales);
        debug!(slot = %player.slot, key = item_key, id = %item_id, "FOV item sold");
        Ok(fov)
    }

    /// A player switched an owned item on (`1`) or off (`0`).
    ///
    /// On re-derives the record from the catalog, exactly like a purchase;
    /// off behaves like a sale.
    ///
    /// # Errors
    /// `InvalidPlayer`, `UnknownItem` (on only), or `UnknownToggleState` for a
    /// flag that is neither 0 nor 1.
    pub fn on_toggled(
        &self,
        player: &PlayerHandle,
        item_id: ItemId,
        item_key: &str,
        state: i32,
    ) -> Result<Fov, HandlerRejection> {
        self.guard(player)?;
        let Some(state) = ToggleState::from_raw(state) else {
            warn!(slot = %player.slot, key = item_key, state, "Ignoring toggle with unknown state");
            return Err(HandlerRejection::UnknownToggleState(state));
        };

        match state {
            ToggleState::On => {
                let fov = self.grant(player, item_id, item_key)?;
                FovShopCounters::bump(&self.counters.toggles_on);
                debug!(slot = %player.slot, key = item_key, fov = %fov, "FOV item toggled on");
                Ok(fov)
            }
            ToggleState::Off => {
                let fov = self.revoke(player);
                FovShopCounters::bump(&self.counters.toggles_off);
                debug!(slot = %player.slot, key = item_key, "FOV item toggled off");
                Ok(fov)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn guard(&self, player: &PlayerHandle) -> Result<(), HandlerRejection> {
        player.ensure_eligible().inspect_err(|_| {
            FovShopCounters::bump(&self.counters.invalid_player_rejections);
            debug!(slot = %player.slot, state = ?player.state, bot = player.is_bot, "Ignoring shop callback for invalid player");
        })
    }

    /// Default/Overridden → Overridden.
    fn grant(&self, player: &PlayerHandle, item_id: ItemId, item_key: &str) -> Result<Fov, HandlerRejection> {
        let Some(item) = self.catalog.get(item_key) else {
            FovShopCounters::bump(&self.counters.unknown_item_rejections);
            warn!(slot = %player.slot, key = item_key, id = %item_id, "Shop callback for item missing from catalog");
            return Err(HandlerRejection::UnknownItem(ItemKey::new(item_key)));
        };

        if let Some(known) = self.item_key(item_id) {
            if known != item.key {
                debug!(id = %item_id, registered = %known, delivered = item_key, "Shop id and key disagree; trusting key");
            }
        }

        let record = OverrideRecord::new(item.fov, item.key.clone(), item_id);
        let (previous, fov) = self.apply.update(player, |store| store.install(player.slot, record));
        if let Some(previous) = previous {
            debug!(slot = %player.slot, replaced = %previous.source_item_key, "Override replaced");
        }
        Ok(fov)
    }

    /// Overridden/Default → Default.
    fn revoke(&self, player: &PlayerHandle) -> Fov {
        let (_, fov) = self.apply.update(player, |store| store.clear(player.slot));
        fov
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

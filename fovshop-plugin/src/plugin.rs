//! The FOV shop plugin — startup wiring and single-entry event dispatch.
//!
//! ## Lifecycle
//!
//! 1. Settings and the catalog document are loaded ([`load_documents`]).
//! 2. [`FovShopPlugin::start`] validates the catalog, creates the shop
//!    category and registers every item, one awaited call at a time.
//! 3. Only after registration completes are spawn/disconnect handlers
//!    subscribed, so no runtime callback can reference an unassigned id.
//! 4. At runtime the host drives the plugin through the registered hooks or
//!    through [`FovShopPlugin::handle`].
//!
//! A catalog that fails validation disables the feature entirely: no
//! category, no callbacks, no subscriptions.

use std::path::Path;
use std::sync::Arc;

use fovshop_core::catalog::{Catalog, RawCatalog};
use fovshop_core::config::FovShopSettings;
use fovshop_core::error::{ConfigError, FovShopError, HandlerRejection, Result};
use fovshop_core::metrics::{CounterSnapshot, FovShopCounters};
use fovshop_core::store::{OverrideRecord, OverrideStore};
use fovshop_core::types::{Fov, ItemId, ItemKey, Slot};
use tracing::{debug, error, info};

use crate::apply::ApplyEngine;
use crate::bridge::{RegistrationReport, ShopBridge};
use crate::events::HostEvent;
use crate::host::{LifecycleBus, PlayerAttributes, ShopService};
use crate::lifecycle::LifecycleAdapter;

/// Read the settings file and the catalog document it points at.
///
/// `catalog_path` in the settings is resolved against `server_root`.
///
/// # Errors
/// Any I/O or parse failure of either document.
pub fn load_documents(settings_path: &Path, server_root: &Path) -> std::result::Result<(FovShopSettings, RawCatalog), ConfigError> {
    let settings = FovShopSettings::from_file(settings_path)?;
    let catalog = RawCatalog::from_file(&server_root.join(&settings.shop.catalog_path))?;
    Ok((settings, catalog))
}

/// A running FOV shop.
pub struct FovShopPlugin {
    settings: FovShopSettings,
    catalog: Arc<Catalog>,
    store: Arc<OverrideStore>,
    apply: Arc<ApplyEngine>,
    counters: Arc<FovShopCounters>,
    bridge: Arc<ShopBridge>,
    lifecycle: Arc<LifecycleAdapter>,
    report: RegistrationReport,
}

impl FovShopPlugin {
    /// Validate the catalog, register it with `shop`, then subscribe to `bus`.
    ///
    /// Items the shop refuses are skipped; see [`FovShopPlugin::registration`].
    ///
    /// # Errors
    /// `Disabled` when switched off in the settings, `Config` when the
    /// catalog is invalid, `Registration` when the category cannot be
    /// created. In every case nothing has been registered or subscribed.
    pub async fn start(
        settings: FovShopSettings,
        raw_catalog: RawCatalog,
        shop: &dyn ShopService,
        bus: &dyn LifecycleBus,
        attributes: Arc<dyn PlayerAttributes>,
    ) -> Result<Self> {
        if !settings.general.enabled {
            info!("FOV shop disabled in settings");
            return Err(FovShopError::Disabled);
        }

        let catalog = match Catalog::load_with_default(raw_catalog, settings.fov.default_fov) {
            Ok(catalog) => Arc::new(catalog),
            Err(err) => {
                error!(error = %err, "FOV catalog invalid; feature disabled");
                return Err(err.into());
            }
        };

        if let Err(err) = shop.create_category(&settings.shop.category, &settings.shop.category_label) {
            error!(category = %settings.shop.category, error = %err, "Could not create shop category; feature disabled");
            return Err(err.into());
        }

        let store = Arc::new(OverrideStore::new());
        let counters = Arc::new(FovShopCounters::new());
        let apply = Arc::new(ApplyEngine::new(
            Arc::clone(&store),
            attributes,
            Arc::clone(&counters),
            catalog.default_fov(),
        ));
        let bridge = Arc::new(ShopBridge::new(
            Arc::clone(&catalog),
            Arc::clone(&apply),
            Arc::clone(&counters),
            settings.shop.category.clone(),
        ));
        let lifecycle = Arc::new(LifecycleAdapter::new(Arc::clone(&apply), Arc::clone(&counters)));

        let report = bridge.register_all(shop).await;
        lifecycle.subscribe(bus);

        info!(
            items = catalog.len(),
            registered = report.registered.len(),
            skipped = report.skipped.len(),
            default_fov = %catalog.default_fov(),
            "FOV shop started"
        );

        Ok(Self {
            settings,
            catalog,
            store,
            apply,
            counters,
            bridge,
            lifecycle,
            report,
        })
    }

    /// [`FovShopPlugin::start`] for synchronous hosts: blocks the calling
    /// thread until registration completes.
    ///
    /// Registration runs on a private current-thread runtime. When the caller
    /// is already inside a runtime, that private runtime is driven from a
    /// scoped helper thread so the caller's runtime is never nested.
    ///
    /// # Errors
    /// As for [`FovShopPlugin::start`], plus `Runtime` if the private runtime
    /// cannot be built or its thread dies.
    pub fn start_blocking(
        settings: FovShopSettings,
        raw_catalog: RawCatalog,
        shop: &dyn ShopService,
        bus: &dyn LifecycleBus,
        attributes: Arc<dyn PlayerAttributes>,
    ) -> Result<Self> {
        let run = move || -> Result<Self> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(FovShopError::Runtime)?;
            runtime.block_on(Self::start(settings, raw_catalog, shop, bus, attributes))
        };

        if tokio::runtime::Handle::try_current().is_err() {
            return run();
        }

        debug!("start_blocking called inside a runtime; registering on a helper thread");
        std::thread::scope(|scope| {
            scope
                .spawn(run)
                .join()
                .map_err(|_| FovShopError::Runtime(std::io::Error::other("registration thread panicked")))?
        })
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Route one host event to its handler.
    ///
    /// Returns the FOV pushed to the player, or `None` for disconnects.
    ///
    /// # Errors
    /// The handler's rejection; already logged and counted.
    pub fn handle(&self, event: &HostEvent) -> std::result::Result<Option<Fov>, HandlerRejection> {
        match event {
            HostEvent::PlayerSpawn { player } => self.lifecycle.on_player_spawn(player).map(Some),
            HostEvent::ClientDisconnect { slot } => {
                self.lifecycle.on_client_disconnect(*slot);
                Ok(None)
            }
            HostEvent::ItemBought {
                player,
                item_id,
                item_key,
                echo,
            } => self.bridge.on_bought(player, *item_id, item_key, *echo).map(Some),
            HostEvent::ItemSold {
                player,
                item_id,
                item_key,
                ..
            } => self.bridge.on_sold(player, *item_id, item_key).map(Some),
            HostEvent::ItemToggled {
                player,
                item_id,
                item_key,
                state,
            } => self.bridge.on_toggled(player, *item_id, item_key, *state).map(Some),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The active override for `slot`, if any.
    #[must_use]
    pub fn override_for(&self, slot: Slot) -> Option<OverrideRecord> {
        self.store.get(slot)
    }

    /// The FOV `slot` would be given on its next spawn.
    #[must_use]
    pub fn visible_fov(&self, slot: Slot) -> Fov {
        self.apply.visible_fov(slot)
    }

    /// Items the shop accepted, ordered by shop id.
    #[must_use]
    pub fn registered_items(&self) -> Vec<(ItemId, ItemKey)> {
        self.bridge.registered_items()
    }

    /// What happened at registration.
    #[must_use]
    pub fn registration(&self) -> &RegistrationReport {
        &self.report
    }

    /// Current counter values.
    #[must_use]
    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// Current counter values in Prometheus text exposition format.
    #[must_use]
    pub fn metrics_text(&self) -> String {
        self.counters.snapshot().to_prometheus()
    }

    /// The validated catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The settings the plugin started with.
    #[must_use]
    pub fn settings(&self) -> &FovShopSettings {
        &self.settings
    }
}

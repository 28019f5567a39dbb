//! Collaborator contracts: what the FOV shop needs from the game host and
//! from the shop service.
//!
//! The host owns player objects, the event bus and the replication
//! machinery; the shop service owns items, prices and ownership. Both are
//! reached only through the traits in this module, so tests and alternative
//! hosts can plug in their own implementations.

use std::sync::Arc;

use async_trait::async_trait;
use fovshop_core::catalog::ItemDefinition;
use fovshop_core::error::{HandlerRejection, RegistrationError};
use fovshop_core::types::{Fov, ItemId, Slot};

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// Connection phase of a player handle at the time a callback fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Seat assigned, client still loading.
    Connecting,
    /// Fully in game.
    Connected,
    /// Gone; the handle is stale.
    Disconnected,
}

/// A snapshot of a player as the host hands it to a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHandle {
    /// Connection seat.
    pub slot: Slot,
    /// Whether the seat is occupied by a bot.
    pub is_bot: bool,
    /// Connection phase.
    pub state: ConnectionState,
}

impl PlayerHandle {
    /// A fully connected human player.
    #[must_use]
    pub fn connected(slot: impl Into<Slot>) -> Self {
        Self {
            slot: slot.into(),
            is_bot: false,
            state: ConnectionState::Connected,
        }
    }

    /// A fully connected bot.
    #[must_use]
    pub fn bot(slot: impl Into<Slot>) -> Self {
        Self {
            is_bot: true,
            ..Self::connected(slot)
        }
    }

    /// Same seat, different connection phase.
    #[must_use]
    pub fn with_state(self, state: ConnectionState) -> Self {
        Self { state, ..self }
    }

    /// Live, human and fully connected.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        !self.is_bot && self.state == ConnectionState::Connected
    }

    /// [`PlayerHandle::is_eligible`] as a `Result`.
    ///
    /// # Errors
    /// Returns `HandlerRejection::InvalidPlayer` for bots and for handles
    /// that are not fully connected.
    pub fn ensure_eligible(&self) -> Result<(), HandlerRejection> {
        if self.is_eligible() {
            Ok(())
        } else {
            Err(HandlerRejection::InvalidPlayer(self.slot))
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute replication
// ---------------------------------------------------------------------------

/// A replicated player attribute, named the way the engine's schema names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRef {
    /// Owning class.
    pub class_name: &'static str,
    /// Field name.
    pub field_name: &'static str,
}

/// The desired-FOV field on the player controller.
pub const FOV_ATTRIBUTE: AttributeRef = AttributeRef {
    class_name: "CBasePlayerController",
    field_name: "m_iDesiredFOV",
};

/// Direct attribute access plus the state-invalidation primitive.
///
/// Treated strictly as "set value, then force replication".
pub trait PlayerAttributes: Send + Sync {
    /// Write the player's desired FOV.
    fn set_desired_fov(&self, player: &PlayerHandle, fov: Fov);

    /// Mark an attribute dirty so the new value replicates to observers.
    fn mark_attribute_dirty(&self, player: &PlayerHandle, attribute: AttributeRef);
}

// ---------------------------------------------------------------------------
// Shop service
// ---------------------------------------------------------------------------

/// Pricing echo delivered with a purchase notification.
///
/// Carried for logging only; the granted FOV is always derived from the
/// catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurchaseEcho {
    /// Price paid.
    pub buy_price: i32,
    /// Refund on a later sale.
    pub sell_price: i32,
    /// Ownership duration in seconds.
    pub duration: i32,
    /// Number owned after the purchase.
    pub count: i32,
}

/// Purchase hook: `(player, item id, item key, pricing echo)`.
pub type BoughtHook = Arc<dyn Fn(&PlayerHandle, ItemId, &str, PurchaseEcho) + Send + Sync>;
/// Sale hook: `(player, item id, item key, sell price)`.
pub type SoldHook = Arc<dyn Fn(&PlayerHandle, ItemId, &str, i32) + Send + Sync>;
/// Toggle hook: `(player, item id, item key, raw toggle flag)`.
pub type ToggledHook = Arc<dyn Fn(&PlayerHandle, ItemId, &str, i32) + Send + Sync>;

/// The three per-item callbacks handed to the shop service.
#[derive(Clone)]
pub struct ItemCallbacks {
    /// Fired after a purchase.
    pub on_bought: BoughtHook,
    /// Fired after a sale.
    pub on_sold: SoldHook,
    /// Fired when an owned item is switched on or off.
    pub on_toggled: ToggledHook,
}

impl std::fmt::Debug for ItemCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemCallbacks").finish_non_exhaustive()
    }
}

/// The external shop/economy service.
#[async_trait]
pub trait ShopService: Send + Sync {
    /// Create the category all FOV items register under.
    ///
    /// # Errors
    /// Returns a `RegistrationError` if the shop cannot create it; nothing
    /// else will register in that case.
    fn create_category(&self, name: &str, display_label: &str) -> Result<(), RegistrationError>;

    /// Register one item and wait for the shop to assign its id.
    ///
    /// # Errors
    /// Returns a `RegistrationError` if the shop refuses the item.
    async fn register_item(&self, category: &str, item: &ItemDefinition) -> Result<ItemId, RegistrationError>;

    /// Attach callbacks to a registered item.
    fn set_callbacks(&self, item_id: ItemId, callbacks: ItemCallbacks);
}

// ---------------------------------------------------------------------------
// Lifecycle bus
// ---------------------------------------------------------------------------

/// Spawn hook: fires every time a player (re)spawns.
pub type SpawnHook = Arc<dyn Fn(&PlayerHandle) + Send + Sync>;
/// Disconnect hook: fires once per connection, keyed by seat.
pub type DisconnectHook = Arc<dyn Fn(Slot) + Send + Sync>;

/// The game's lifecycle event bus.
pub trait LifecycleBus: Send + Sync {
    /// Subscribe to player spawns.
    fn on_player_spawn(&self, hook: SpawnHook);

    /// Subscribe to client disconnects.
    fn on_client_disconnect(&self, hook: DisconnectHook);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

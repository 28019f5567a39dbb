//! Host events as values.
//!
//! For hosts that queue events instead of invoking registered closures. Each
//! variant maps one-to-one onto a bridge or lifecycle handler; see
//! [`crate::plugin::FovShopPlugin::handle`].

use fovshop_core::types::{ItemId, Slot};

use crate::host::{PlayerHandle, PurchaseEcho};

/// An event delivered by the game host or the shop service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A player (re)spawned.
    PlayerSpawn {
        player: PlayerHandle,
    },

    /// A client left its seat.
    ClientDisconnect {
        slot: Slot,
    },

    /// A player bought an item.
    ItemBought {
        player: PlayerHandle,
        item_id: ItemId,
        item_key: String,
        echo: PurchaseEcho,
    },

    /// A player sold an item.
    ItemSold {
        player: PlayerHandle,
        item_id: ItemId,
        item_key: String,
        sell_price: i32,
    },

    /// A player toggled an owned item (1 = on, 0 = off).
    ItemToggled {
        player: PlayerHandle,
        item_id: ItemId,
        item_key: String,
        state: i32,
    },
}

impl HostEvent {
    /// The seat this event concerns.
    #[must_use]
    pub fn slot(&self) -> Slot {
        match self {
            Self::ClientDisconnect { slot } => *slot,
            Self::PlayerSpawn { player }
            | Self::ItemBought { player, .. }
            | Self::ItemSold { player, .. }
            | Self::ItemToggled { player, .. } => player.slot,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayerSpawn { .. } => "player_spawn",
            Self::ClientDisconnect { .. } => "client_disconnect",
            Self::ItemBought { .. } => "item_bought",
            Self::ItemSold { .. } => "item_sold",
            Self::ItemToggled { .. } => "item_toggled",
        }
    }
}

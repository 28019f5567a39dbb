//! # fovshop-plugin — Host Integration for the FOV Shop
//!
//! Wires the host-agnostic `fovshop-core` engine to a shop service and a
//! game host.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  bought/sold/toggled  ┌─────────────┐
//! │ Shop service │ ────────────────────▶ │ ShopBridge  │──┐
//! └──────────────┘                       └─────────────┘  │ install/clear
//!                                                         ▼
//! ┌──────────────┐  spawn/disconnect     ┌─────────────┐ ┌───────────────┐
//! │ Lifecycle bus│ ────────────────────▶ │ Lifecycle   │▶│ OverrideStore │
//! └──────────────┘                       │ Adapter     │ └───────┬───────┘
//!                                        └──────┬──────┘         │ read
//!                                               ▼                ▼
//!                                        ┌──────────────────────────┐
//!                                        │       ApplyEngine        │──▶ set + invalidate
//!                                        └──────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `host` — collaborator traits and the player handle
//! - `apply` — pushes the visible FOV through the invalidation primitive
//! - `bridge` — catalog registration and shop callbacks
//! - `lifecycle` — spawn reapply and disconnect cleanup
//! - `events` — host events as values
//! - `plugin` — startup and single-entry dispatch
//! - `logging` — tracing subscriber setup

pub mod apply;
pub mod bridge;
pub mod events;
pub mod host;
pub mod lifecycle;
pub mod logging;
pub mod plugin;

pub use apply::ApplyEngine;
pub use bridge::{RegistrationReport, ShopBridge};
pub use events::HostEvent;
pub use host::{
    ConnectionState, FOV_ATTRIBUTE, ItemCallbacks, LifecycleBus, PlayerAttributes, PlayerHandle, PurchaseEcho,
    ShopService,
};
pub use lifecycle::LifecycleAdapter;
pub use plugin::{FovShopPlugin, load_documents};

//! # FOV Shop Core Library
//!
//! Host-agnostic engine for purchasable camera field-of-view overrides.
//!
//! - [`Catalog`] — immutable item definitions, loaded once at startup.
//! - [`OverrideStore`] — concurrency-safe slot → active override mapping.
//! - [`FovShopSettings`] — plugin settings loaded from TOML.
//! - [`metrics`] — lock-free counters for callback traffic.
//!
//! Wiring to a concrete shop service and game host lives in
//! `fovshop-plugin`.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod types;

pub use catalog::{Catalog, ItemDefinition, RawCatalog, RawItem};
pub use config::FovShopSettings;
pub use error::{ConfigError, FovShopError, HandlerRejection, RegistrationError, Result};
pub use metrics::{CounterSnapshot, FovShopCounters};
pub use store::{OverrideRecord, OverrideStore};
pub use types::*;

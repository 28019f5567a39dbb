//! Error types for the FOV shop.
//!
//! Only [`ConfigError`] is ever fatal, and only to startup. Everything else is
//! recovered where it happens and surfaces as a log line.

use thiserror::Error;

use crate::types::{ItemKey, Slot};

/// Catalog or settings could not be loaded. Disables the whole feature.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document could not be read from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not well-formed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The same item key appears more than once.
    #[error("Duplicate item key: {0}")]
    DuplicateKey(ItemKey),

    /// A required item field is absent.
    #[error("Item {key}: missing required field `{field}`")]
    MissingField {
        /// Offending item.
        key: ItemKey,
        /// Field name as written in the document.
        field: &'static str,
    },

    /// A price, sell price or duration is below zero.
    #[error("Item {key}: `{field}` must be non-negative (got {value})")]
    NegativeValue {
        /// Offending item.
        key: ItemKey,
        /// Field name as written in the document.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// The FOV value is not a positive number of degrees.
    #[error("Item {key}: fov must be positive (got {value})")]
    InvalidFov {
        /// Offending item.
        key: ItemKey,
        /// The rejected value.
        value: i64,
    },
}

/// A single catalog item could not be registered with the shop service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The shop service could not be reached or is not loaded.
    #[error("Shop service unavailable: {0}")]
    ShopUnavailable(String),

    /// The shop service refused the item.
    #[error("Shop rejected item {key}: {reason}")]
    Rejected {
        /// Item that was refused.
        key: ItemKey,
        /// Reason reported by the shop.
        reason: String,
    },
}

/// Why a shop or lifecycle callback was turned into a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerRejection {
    /// The player handle is a bot, not fully connected, or stale.
    #[error("Invalid player handle in slot {0}")]
    InvalidPlayer(Slot),

    /// The callback named an item the catalog does not know.
    #[error("Unknown item key: {0}")]
    UnknownItem(ItemKey),

    /// The toggle flag was neither on nor off.
    #[error("Unknown toggle state: {0}")]
    UnknownToggleState(i32),
}

/// Top-level error type for fallible FOV shop operations.
#[derive(Error, Debug)]
pub enum FovShopError {
    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Shop registration failure that prevents any item from registering.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// The feature is switched off in the settings.
    #[error("FOV shop disabled in settings")]
    Disabled,

    /// The runtime driving startup registration could not be built.
    #[error("Registration runtime error: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, FovShopError>;

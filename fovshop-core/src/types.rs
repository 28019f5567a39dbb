//! Core type definitions shared by the catalog, the override store and the
//! host integration layer.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Number of connection seats a server hands out. Slots are `0..MAX_SLOTS`.
pub const MAX_SLOTS: usize = 65;

/// A connection seat on the server. Reused across disconnect/reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot(pub u32);

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Slot {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Unique key of a catalog item, as written in the catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey(pub String);

impl ItemKey {
    /// Create a key from anything string-like.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ItemKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

/// Numeric item id assigned by the shop service at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub i32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Field of View
// ---------------------------------------------------------------------------

/// A desired camera field-of-view value, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fov(pub u32);

impl Fov {
    /// The engine default. Pushing it is a no-op from the player's point of view.
    pub const DEFAULT: Self = Self(90);

    /// Raw value in degrees.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Fov {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Fov {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

/// State carried by a shop toggle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToggleState {
    /// The owned item's effect should be active.
    On,
    /// The owned item's effect should be cleared.
    Off,
}

impl ToggleState {
    /// Decode the shop's integer toggle flag (1 = on, 0 = off).
    ///
    /// Returns `None` for any other value.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(Self::On),
            0 => Some(Self::Off),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_state_decodes_shop_flags() {
        assert_eq!(ToggleState::from_raw(1), Some(ToggleState::On));
        assert_eq!(ToggleState::from_raw(0), Some(ToggleState::Off));
        assert_eq!(ToggleState::from_raw(2), None);
        assert_eq!(ToggleState::from_raw(-1), None);
    }

    #[test]
    fn default_fov_is_ninety() {
        assert_eq!(Fov::default(), Fov(90));
        assert_eq!(Fov::DEFAULT.get(), 90);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Slot(7).to_string(), "7");
        assert_eq!(ItemKey::new("zoom").to_string(), "zoom");
        assert_eq!(ItemId(12).to_string(), "#12");
    }
}

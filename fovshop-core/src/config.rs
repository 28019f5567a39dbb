//! Plugin settings, loadable from `fovshop.toml`.
//!
//! The item catalog itself lives in a separate JSON document; see
//! [`crate::catalog`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Fov;

/// Top-level FOV shop settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FovShopSettings {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Shop category and catalog location.
    #[serde(default)]
    pub shop: ShopConfig,
    /// FOV defaults.
    #[serde(default)]
    pub fov: FovConfig,
}

impl FovShopSettings {
    /// Load settings from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` if the TOML is invalid or a value is out
    /// of range.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Self =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fov.default_fov.get() == 0 {
            return Err(ConfigError::Parse("fov.default_fov must be positive".into()));
        }
        if self.shop.category.trim().is_empty() {
            return Err(ConfigError::Parse("shop.category must not be empty".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General plugin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether the FOV shop is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

/// Where the items show up in the shop and where they are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Internal category name all items register under.
    #[serde(default = "default_category")]
    pub category: String,
    /// Label players see for the category.
    #[serde(default = "default_category")]
    pub category_label: String,
    /// Path of the JSON item catalog, relative to the server root.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            category: default_category(),
            category_label: default_category(),
            catalog_path: default_catalog_path(),
        }
    }
}

/// FOV defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FovConfig {
    /// Value pushed when a player has no override. Also the fallback for
    /// catalog items that omit `fov`.
    #[serde(default)]
    pub default_fov: Fov,
}

impl Default for FovConfig {
    fn default() -> Self {
        Self {
            default_fov: Fov::DEFAULT,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_category() -> String {
    "FOV".to_string()
}

fn default_catalog_path() -> String {
    "configs/plugins/Shop/FOV.json".to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Item catalog: the immutable set of purchasable FOV items.
//!
//! Built once at startup from the JSON catalog document:
//!
//! ```json
//! {
//!   "zoom": { "name": "Zoomed in", "price": 10, "sellprice": 5, "duration": 0, "fov": 60 },
//!   "wide": { "name": "Wide",      "price": 20, "sellprice": 10, "duration": 86400, "fov": 120 }
//! }
//! ```
//!
//! After [`Catalog::load`] succeeds there are no error paths left; lookups
//! return `Option`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::types::{Fov, ItemKey};

// ---------------------------------------------------------------------------
// Raw document
// ---------------------------------------------------------------------------

/// Item fields exactly as written in the catalog document.
///
/// Field names follow the shop's JSON convention; camelCase aliases are
/// accepted as well.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    /// Display name shown in the shop menu.
    #[serde(default, alias = "displayName")]
    pub name: Option<String>,
    /// Purchase price.
    #[serde(default)]
    pub price: Option<i64>,
    /// Refund on sale.
    #[serde(default, alias = "sellPrice")]
    pub sellprice: Option<i64>,
    /// Ownership duration in seconds; 0 or absent means permanent.
    #[serde(default, alias = "durationSeconds")]
    pub duration: Option<i64>,
    /// Desired FOV; absent or null means the no-op default.
    #[serde(default, alias = "fovValue")]
    pub fov: Option<i64>,
}

impl RawItem {
    /// Build a complete raw item.
    #[must_use]
    pub fn new(name: impl Into<String>, price: i64, sellprice: i64, duration: i64, fov: Option<i64>) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            sellprice: Some(sellprice),
            duration: Some(duration),
            fov,
        }
    }
}

/// The catalog document before validation.
///
/// Keeps entries in document order and keeps duplicate keys, so that
/// [`Catalog::load`] can reject them instead of silently keeping the last one.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    entries: Vec<(ItemKey, RawItem)>,
}

impl RawCatalog {
    /// An empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, key: impl Into<String>, item: RawItem) {
        self.entries.push((ItemKey::new(key), item));
    }

    /// Builder form of [`RawCatalog::push`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, item: RawItem) -> Self {
        self.push(key, item);
        self
    }

    /// Parse a JSON catalog document.
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` if the JSON is malformed or not an object
    /// of objects.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a JSON catalog document.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Number of entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for RawCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of item key to item fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, item)) = map.next_entry::<String, RawItem>()? {
                    entries.push((ItemKey(key), item));
                }
                Ok(RawCatalog { entries })
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

// ---------------------------------------------------------------------------
// Validated catalog
// ---------------------------------------------------------------------------

/// A validated, immutable catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefinition {
    /// Unique catalog key.
    pub key: ItemKey,
    /// Display name shown in the shop menu.
    pub display_name: String,
    /// Purchase price.
    pub price: u32,
    /// Refund on sale.
    pub sell_price: u32,
    /// Ownership duration in seconds; 0 = permanent.
    pub duration_seconds: u32,
    /// FOV granted while the item is active.
    pub fov: Fov,
}

/// The process-lifetime item catalog.
///
/// Iteration order is ascending by FOV, ties broken by key, so the shop
/// lists items from subtle to extreme.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<ItemDefinition>,
    index: HashMap<ItemKey, usize>,
    default_fov: Fov,
}

impl Catalog {
    /// Validate a raw document, using [`Fov::DEFAULT`] as the no-op value.
    ///
    /// # Errors
    /// See [`Catalog::load_with_default`].
    pub fn load(raw: RawCatalog) -> Result<Self, ConfigError> {
        Self::load_with_default(raw, Fov::DEFAULT)
    }

    /// Validate a raw document.
    ///
    /// Items without `fov` get `default_fov`.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found: duplicate key, missing
    /// `name`/`price`/`sellprice`, negative price/sell price/duration, or a
    /// non-positive FOV. Nothing is built on error.
    pub fn load_with_default(raw: RawCatalog, default_fov: Fov) -> Result<Self, ConfigError> {
        let mut items = Vec::with_capacity(raw.entries.len());
        let mut seen = HashSet::with_capacity(raw.entries.len());

        for (key, fields) in raw.entries {
            if !seen.insert(key.clone()) {
                return Err(ConfigError::DuplicateKey(key));
            }
            items.push(validate_item(key, fields, default_fov)?);
        }

        items.sort_by(|a, b| a.fov.cmp(&b.fov).then_with(|| a.key.cmp(&b.key)));

        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.key.clone(), i))
            .collect();

        for item in &items {
            debug!(key = %item.key, fov = %item.fov, price = item.price, "Catalog item loaded");
        }
        info!(items = items.len(), default_fov = %default_fov, "FOV catalog loaded");

        Ok(Self {
            items,
            index,
            default_fov,
        })
    }

    /// Look up an item by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ItemDefinition> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    /// FOV granted by an item, if the key is known.
    #[must_use]
    pub fn fov_for(&self, key: &str) -> Option<Fov> {
        self.get(key).map(|item| item.fov)
    }

    /// The no-op FOV pushed when a player has no override.
    #[must_use]
    pub fn default_fov(&self) -> Fov {
        self.default_fov
    }

    /// Items in registration order (ascending FOV).
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.iter()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn validate_item(key: ItemKey, raw: RawItem, default_fov: Fov) -> Result<ItemDefinition, ConfigError> {
    let Some(display_name) = raw.name else {
        return Err(ConfigError::MissingField { key, field: "name" });
    };
    let Some(price) = raw.price else {
        return Err(ConfigError::MissingField { key, field: "price" });
    };
    let Some(sell_price) = raw.sellprice else {
        return Err(ConfigError::MissingField { key, field: "sellprice" });
    };

    let price = non_negative(&key, "price", price)?;
    let sell_price = non_negative(&key, "sellprice", sell_price)?;
    let duration_seconds = non_negative(&key, "duration", raw.duration.unwrap_or(0))?;

    let fov = match raw.fov {
        None => default_fov,
        Some(value) if value <= 0 => return Err(ConfigError::InvalidFov { key, value }),
        Some(value) => Fov(u32::try_from(value).map_err(|_| ConfigError::InvalidFov {
            key: key.clone(),
            value,
        })?),
    };

    Ok(ItemDefinition {
        key,
        display_name,
        price,
        sell_price,
        duration_seconds,
        fov,
    })
}

fn non_negative(key: &ItemKey, field: &'static str, value: i64) -> Result<u32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::NegativeValue {
            key: key.clone(),
            field,
            value,
        });
    }
    u32::try_from(value)
        .map_err(|_| ConfigError::Parse(format!("item {key}: `{field}` out of range ({value})")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn item(fov: Option<i64>) -> RawItem {
        RawItem::new("item", 10, 5, 0, fov)
    }

    #[test]
    fn items_enumerate_by_ascending_fov() {
        let raw = RawCatalog::new()
            .with("wide", item(Some(120)))
            .with("zoom", item(Some(60)))
            .with("mid", item(Some(100)));
        let catalog = Catalog::load(raw).expect("valid");

        let keys: Vec<_> = catalog.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["zoom", "mid", "wide"]);
    }

    #[test]
    fn equal_fov_ties_break_by_key() {
        let raw = RawCatalog::new()
            .with("b", item(Some(100)))
            .with("a", item(Some(100)));
        let catalog = Catalog::load(raw).expect("valid");

        let keys: Vec<_> = catalog.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn missing_fov_defaults_to_no_op() {
        let catalog = Catalog::load(RawCatalog::new().with("plain", item(None))).expect("valid");
        assert_eq!(catalog.fov_for("plain"), Some(Fov::DEFAULT));

        let catalog = Catalog::load_with_default(RawCatalog::new().with("plain", item(None)), Fov(100))
            .expect("valid");
        assert_eq!(catalog.fov_for("plain"), Some(Fov(100)));
        assert_eq!(catalog.default_fov(), Fov(100));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let json = r#"{
            "zoom": { "name": "Zoom", "price": 10, "sellprice": 5, "duration": 0, "fov": 60 },
            "zoom": { "name": "Zoom 2", "price": 10, "sellprice": 5, "duration": 0, "fov": 70 }
        }"#;
        let raw = RawCatalog::from_json_str(json).expect("parses");
        assert_eq!(raw.len(), 2);

        let err = Catalog::load(raw).expect_err("duplicate");
        assert!(matches!(err, ConfigError::DuplicateKey(k) if k.as_str() == "zoom"));
    }

    #[test]
    fn negative_values_are_rejected() {
        let err = Catalog::load(RawCatalog::new().with("x", RawItem::new("X", -1, 0, 0, None)))
            .expect_err("negative price");
        assert!(matches!(err, ConfigError::NegativeValue { field: "price", value: -1, .. }));

        let err = Catalog::load(RawCatalog::new().with("x", RawItem::new("X", 1, -5, 0, None)))
            .expect_err("negative sell price");
        assert!(matches!(err, ConfigError::NegativeValue { field: "sellprice", .. }));

        let err = Catalog::load(RawCatalog::new().with("x", RawItem::new("X", 1, 0, -60, None)))
            .expect_err("negative duration");
        assert!(matches!(err, ConfigError::NegativeValue { field: "duration", .. }));
    }

    #[test]
    fn non_positive_fov_is_rejected() {
        let err = Catalog::load(RawCatalog::new().with("x", item(Some(0)))).expect_err("zero fov");
        assert!(matches!(err, ConfigError::InvalidFov { value: 0, .. }));
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let raw = RawCatalog::from_json_str(r#"{ "x": { "price": 1, "sellprice": 0 } }"#).expect("parses");
        let err = Catalog::load(raw).expect_err("no name");
        assert!(matches!(err, ConfigError::MissingField { field: "name", .. }));

        let raw = RawCatalog::from_json_str(r#"{ "x": { "name": "X", "sellprice": 0 } }"#).expect("parses");
        let err = Catalog::load(raw).expect_err("no price");
        assert!(matches!(err, ConfigError::MissingField { field: "price", .. }));
    }

    #[test]
    fn json_document_with_aliases_and_null_fov() {
        let json = r#"{
            "zoom": { "displayName": "Zoom", "price": 10, "sellPrice": 5, "durationSeconds": 3600, "fovValue": 60 },
            "plain": { "name": "Plain", "price": 1, "sellprice": 0, "fov": null }
        }"#;
        let catalog = Catalog::load(RawCatalog::from_json_str(json).expect("parses")).expect("valid");

        let zoom = catalog.get("zoom").expect("zoom");
        assert_eq!(zoom.display_name, "Zoom");
        assert_eq!(zoom.sell_price, 5);
        assert_eq!(zoom.duration_seconds, 3600);
        assert_eq!(zoom.fov, Fov(60));

        let plain = catalog.get("plain").expect("plain");
        assert_eq!(plain.duration_seconds, 0);
        assert_eq!(plain.fov, Fov::DEFAULT);
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let err = RawCatalog::from_json_str("[1, 2, 3]").expect_err("not a map");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_key_lookup_is_none() {
        let catalog = Catalog::load(RawCatalog::new()).expect("empty is fine");
        assert!(catalog.is_empty());
        assert!(catalog.get("anything").is_none());
    }
}

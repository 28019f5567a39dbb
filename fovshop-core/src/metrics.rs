//! Runtime counters for the FOV shop.
//!
//! Lock-free `AtomicU64` counters bumped on the callback paths and read on
//! export. Relaxed ordering: the numbers are diagnostics, not synchronization.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for callback traffic.
#[derive(Debug)]
pub struct FovShopCounters {
    /// Accepted purchases.
    pub purchases: AtomicU64,
    /// Accepted sales.
    pub sales: AtomicU64,
    /// Accepted toggle-on notifications.
    pub toggles_on: AtomicU64,
    /// Accepted toggle-off notifications.
    pub toggles_off: AtomicU64,
    /// FOV pushes to the host (spawn reapply and immediate applies).
    pub applies: AtomicU64,
    /// Disconnects that actually removed an override.
    pub disconnect_clears: AtomicU64,
    /// Callbacks dropped for a bot, stale or half-connected handle.
    pub invalid_player_rejections: AtomicU64,
    /// Callbacks dropped for an item key missing from the catalog.
    pub unknown_item_rejections: AtomicU64,
    /// Items skipped at startup because the shop refused them.
    pub registration_failures: AtomicU64,
}

impl FovShopCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            purchases: AtomicU64::new(0),
            sales: AtomicU64::new(0),
            toggles_on: AtomicU64::new(0),
            toggles_off: AtomicU64::new(0),
            applies: AtomicU64::new(0),
            disconnect_clears: AtomicU64::new(0),
            invalid_player_rejections: AtomicU64::new(0),
            unknown_item_rejections: AtomicU64::new(0),
            registration_failures: AtomicU64::new(0),
        }
    }

    /// Increment one counter.
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters for export.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            purchases: self.purchases.load(Ordering::Relaxed),
            sales: self.sales.load(Ordering::Relaxed),
            toggles_on: self.toggles_on.load(Ordering::Relaxed),
            toggles_off: self.toggles_off.load(Ordering::Relaxed),
            applies: self.applies.load(Ordering::Relaxed),
            disconnect_clears: self.disconnect_clears.load(Ordering::Relaxed),
            invalid_player_rejections: self.invalid_player_rejections.load(Ordering::Relaxed),
            unknown_item_rejections: self.unknown_item_rejections.load(Ordering::Relaxed),
            registration_failures: self.registration_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for FovShopCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of counter values at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Accepted purchases.
    pub purchases: u64,
    /// Accepted sales.
    pub sales: u64,
    /// Accepted toggle-on notifications.
    pub toggles_on: u64,
    /// Accepted toggle-off notifications.
    pub toggles_off: u64,
    /// FOV pushes to the host.
    pub applies: u64,
    /// Disconnects that removed an override.
    pub disconnect_clears: u64,
    /// Callbacks dropped for invalid handles.
    pub invalid_player_rejections: u64,
    /// Callbacks dropped for unknown item keys.
    pub unknown_item_rejections: u64,
    /// Items skipped at registration.
    pub registration_failures: u64,
}

impl CounterSnapshot {
    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        let rows: [(&str, &str, u64); 9] = [
            ("fovshop_purchases_total", "Accepted purchases", self.purchases),
            ("fovshop_sales_total", "Accepted sales", self.sales),
            ("fovshop_toggles_on_total", "Accepted toggle-on notifications", self.toggles_on),
            ("fovshop_toggles_off_total", "Accepted toggle-off notifications", self.toggles_off),
            ("fovshop_applies_total", "FOV values pushed to players", self.applies),
            ("fovshop_disconnect_clears_total", "Overrides cleared on disconnect", self.disconnect_clears),
            ("fovshop_invalid_player_total", "Callbacks ignored for invalid player handles", self.invalid_player_rejections),
            ("fovshop_unknown_item_total", "Callbacks ignored for unknown item keys", self.unknown_item_rejections),
            ("fovshop_registration_failures_total", "Catalog items the shop refused", self.registration_failures),
        ];

        let mut out = String::new();
        for (name, help, value) in rows {
            out.push_str(&format!(
                "# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n"
            ));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let counters = FovShopCounters::new();
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn bump_is_visible_in_snapshot() {
        let counters = FovShopCounters::new();
        FovShopCounters::bump(&counters.purchases);
        FovShopCounters::bump(&counters.purchases);
        FovShopCounters::bump(&counters.disconnect_clears);

        let snap = counters.snapshot();
        assert_eq!(snap.purchases, 2);
        assert_eq!(snap.disconnect_clears, 1);
        assert_eq!(snap.sales, 0);
    }

    #[test]
    fn prometheus_export_contains_every_counter() {
        let snap = CounterSnapshot {
            applies: 7,
            ..CounterSnapshot::default()
        };
        let text = snap.to_prometheus();
        assert!(text.contains("fovshop_applies_total 7"));
        assert!(text.contains("# TYPE fovshop_purchases_total counter"));
        assert_eq!(text.matches("# HELP").count(), 9);
    }
}

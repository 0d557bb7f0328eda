//! Filter store
//!
//! Holds the last-applied FilterSet per view. Sets are replaced wholesale on
//! every apply or reset, never merged with what was stored before.
//!
//! Widgets pull the current filters at fetch time through a [`FilterReader`],
//! a watch-channel handle that can be read from inside a widget's reload
//! call without borrowing the coordinator.

use std::collections::HashMap;

use tokio::sync::watch;
use tracing::debug;

use crate::domain::{FilterSet, ViewId};
use crate::page::FilterPanel;

type FilterMap = HashMap<ViewId, FilterSet>;

/// Capture the filter set currently entered in a panel
///
/// Reads value-bearing controls in panel order and keeps only non-empty
/// values. Reading the same unchanged panel twice yields equal sets.
pub fn capture(panel: &FilterPanel) -> FilterSet {
    let filters: FilterSet = panel
        .value_controls()
        .map(|c| (c.name.as_str(), c.value.as_str()))
        .collect();
    debug!(panel_id = %panel.id, count = filters.len(), "capture");
    filters
}

/// Per-view store of applied filters
pub struct FilterStore {
    tx: watch::Sender<FilterMap>,
}

impl FilterStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(FilterMap::new());
        Self { tx }
    }

    /// Capture the filter set currently entered in a panel
    pub fn capture(&self, panel: &FilterPanel) -> FilterSet {
        capture(panel)
    }

    /// Replace the stored set for a view
    pub fn apply(&self, view_id: &ViewId, filters: FilterSet) {
        debug!(%view_id, %filters, "FilterStore::apply");
        self.tx.send_modify(|map| {
            map.insert(view_id.clone(), filters);
        });
    }

    /// Store the empty set for a view and clear the panel's visible values
    pub fn reset(&self, view_id: &ViewId, panel: &mut FilterPanel) {
        debug!(%view_id, panel_id = %panel.id, "FilterStore::reset");
        panel.clear_values();
        self.tx.send_modify(|map| {
            map.insert(view_id.clone(), FilterSet::new());
        });
    }

    /// Stored set for a view, or the empty set if none was applied
    pub fn get(&self, view_id: &ViewId) -> FilterSet {
        self.tx.borrow().get(view_id).cloned().unwrap_or_default()
    }

    /// Whether any apply or reset has been recorded for a view
    pub fn has_entry(&self, view_id: &ViewId) -> bool {
        self.tx.borrow().contains_key(view_id)
    }

    /// Create a read handle for external fetch logic
    pub fn reader(&self) -> FilterReader {
        FilterReader { rx: self.tx.subscribe() }
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterStore").field("filters", &*self.tx.borrow()).finish()
    }
}

/// Read-only handle onto the filter store
///
/// Cheap to clone. Hand one to each widget's fetch logic so it can pull the
/// current filters when it builds its query.
#[derive(Clone, Debug)]
pub struct FilterReader {
    rx: watch::Receiver<FilterMap>,
}

impl FilterReader {
    /// Current filters for a view, or the empty set
    pub fn get(&self, view_id: &ViewId) -> FilterSet {
        self.rx.borrow().get(view_id).cloned().unwrap_or_default()
    }

    /// Wait until any view's filters change
    ///
    /// Errors once the owning store has been dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ControlKind, FilterControl};
    use proptest::prelude::*;

    fn panel(values: &[(&str, &str)]) -> FilterPanel {
        values.iter().fold(FilterPanel::new("p", "logs"), |p, (name, value)| {
            p.with_control(FilterControl::text(*name).with_value(*value))
        })
    }

    #[test]
    fn test_capture_skips_empty_values() {
        let panel = panel(&[("status", "active"), ("owner", "")]);
        let filters = capture(&panel);

        let expected: FilterSet = [("status", "active")].into_iter().collect();
        assert_eq!(filters, expected);
    }

    #[test]
    fn test_capture_keeps_whitespace_only_value() {
        let panel = panel(&[("q", " "), ("status", "active")]);
        let filters = capture(&panel);

        assert_eq!(filters.len(), 2);
        assert_eq!(filters.get("q"), Some(" "));
        assert_eq!(filters.get("status"), Some("active"));
    }

    #[test]
    fn test_capture_ignores_buttons() {
        let panel = panel(&[("level", "warn")])
            .with_control(FilterControl::new("apply", ControlKind::Button).with_value("Apply"));
        let filters = capture(&panel);
        assert_eq!(filters.len(), 1);
        assert!(!filters.contains("apply"));
    }

    #[test]
    fn test_get_defaults_to_empty() {
        let store = FilterStore::new();
        assert!(store.get(&ViewId::new("never")).is_empty());
        assert!(!store.has_entry(&ViewId::new("never")));
    }

    #[test]
    fn test_apply_replaces_not_merges() {
        let store = FilterStore::new();
        let view = ViewId::new("logs");

        store.apply(&view, [("a", "1")].into_iter().collect());
        store.apply(&view, [("b", "2")].into_iter().collect());

        let expected: FilterSet = [("b", "2")].into_iter().collect();
        assert_eq!(store.get(&view), expected);
    }

    #[test]
    fn test_reset_clears_store_and_panel() {
        let store = FilterStore::new();
        let view = ViewId::new("logs");
        let mut panel = panel(&[("status", "active"), ("owner", "bob")]);

        store.apply(&view, capture(&panel));
        assert_eq!(store.get(&view).len(), 2);

        store.reset(&view, &mut panel);
        assert!(store.get(&view).is_empty());
        assert!(store.has_entry(&view));
        assert!(panel.value_controls().all(|c| c.value.is_empty()));
    }

    #[test]
    fn test_views_are_independent() {
        let store = FilterStore::new();
        store.apply(&ViewId::new("logs"), [("level", "error")].into_iter().collect());
        store.apply(&ViewId::new("users"), [("role", "admin")].into_iter().collect());

        assert_eq!(store.get(&ViewId::new("logs")).get("level"), Some("error"));
        assert_eq!(store.get(&ViewId::new("users")).get("role"), Some("admin"));
        assert!(!store.get(&ViewId::new("users")).contains("level"));
    }

    #[test]
    fn test_reader_sees_latest_apply() {
        let store = FilterStore::new();
        let reader = store.reader();
        let view = ViewId::new("logs");

        assert!(reader.get(&view).is_empty());
        store.apply(&view, [("level", "error")].into_iter().collect());
        assert_eq!(reader.get(&view).get("level"), Some("error"));
    }

    #[tokio::test]
    async fn test_reader_changed_wakes_on_apply() {
        let store = FilterStore::new();
        let mut reader = store.reader();

        store.apply(&ViewId::new("logs"), [("level", "info")].into_iter().collect());
        reader.changed().await.unwrap();
        assert_eq!(reader.get(&ViewId::new("logs")).get("level"), Some("info"));
    }

    #[tokio::test]
    async fn test_reader_errors_after_store_dropped() {
        let store = FilterStore::new();
        let mut reader = store.reader();
        drop(store);
        assert!(reader.changed().await.is_err());
    }

    proptest! {
        #[test]
        fn prop_capture_is_idempotent(values in proptest::collection::vec(("[a-z]{1,8}", "[a-z ]{0,6}"), 0..12)) {
            let controls: Vec<(&str, &str)> = values.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            let panel = panel(&controls);
            prop_assert_eq!(capture(&panel), capture(&panel));
        }

        #[test]
        fn prop_capture_never_stores_empty_values(values in proptest::collection::vec(("[a-z]{1,8}", "[a-z ]{0,6}"), 0..12)) {
            let controls: Vec<(&str, &str)> = values.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            let filters = capture(&panel(&controls));
            prop_assert!(filters.iter().all(|(_, v)| !v.is_empty()));
        }
    }
}

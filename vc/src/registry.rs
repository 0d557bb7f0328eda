//! View registry
//!
//! Maps a view id to the widget that renders it. The registry holds weak
//! references: the rendering library owns its widgets, and a widget that
//! has been dropped resolves the same as one that never registered.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::domain::ViewId;

/// A data-rendering widget owned by an external rendering library
///
/// Both refresh operations must keep the widget's current page and scroll
/// position; the trait has no reset-to-first-page operation.
pub trait DataWidget: Send + Sync {
    /// Whether the widget fetches rows from a server and can re-issue that fetch
    fn supports_reload(&self) -> bool {
        false
    }

    /// Re-issue the widget's data query, keeping pagination
    ///
    /// Fire-and-forget: the fetch completes on the widget's own schedule.
    fn reload_keeping_position(&self) {
        self.redraw_keeping_position();
    }

    /// Re-render current rows, keeping pagination
    fn redraw_keeping_position(&self);
}

/// Registry of view id -> widget handle
#[derive(Default)]
pub struct Registry {
    widgets: HashMap<ViewId, Weak<dyn DataWidget>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the handle for a view; the last registration wins
    pub fn register(&mut self, view_id: ViewId, widget: &Arc<dyn DataWidget>) {
        debug!(%view_id, "Registry::register");
        if self.widgets.insert(view_id.clone(), Arc::downgrade(widget)).is_some() {
            debug!(%view_id, "Registry::register: replaced previous handle");
        }
    }

    /// Look up the live widget for a view
    pub fn resolve(&self, view_id: &ViewId) -> Option<Arc<dyn DataWidget>> {
        self.widgets.get(view_id).and_then(Weak::upgrade)
    }

    /// Whether a view has ever been registered, live or not
    pub fn contains(&self, view_id: &ViewId) -> bool {
        self.widgets.contains_key(view_id)
    }

    pub fn view_ids(&self) -> impl Iterator<Item = &ViewId> {
        self.widgets.keys()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("views", &self.widgets.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingWidget {
        redraws: AtomicUsize,
    }

    impl DataWidget for CountingWidget {
        fn redraw_keeping_position(&self) {
            self.redraws.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_resolve_unregistered() {
        let registry = Registry::new();
        assert!(registry.resolve(&ViewId::new("logs")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_overwrites() {
        let first = Arc::new(CountingWidget::default());
        let second = Arc::new(CountingWidget::default());
        let first_dyn: Arc<dyn DataWidget> = first.clone();
        let second_dyn: Arc<dyn DataWidget> = second.clone();

        let mut registry = Registry::new();
        registry.register(ViewId::new("logs"), &first_dyn);
        registry.register(ViewId::new("logs"), &second_dyn);
        assert_eq!(registry.len(), 1);

        let resolved = registry.resolve(&ViewId::new("logs")).unwrap();
        resolved.redraw_keeping_position();

        assert_eq!(first.redraws.load(Ordering::SeqCst), 0);
        assert_eq!(second.redraws.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_widget_resolves_absent() {
        let mut registry = Registry::new();
        {
            let widget: Arc<dyn DataWidget> = Arc::new(CountingWidget::default());
            registry.register(ViewId::new("users"), &widget);
            assert!(registry.resolve(&ViewId::new("users")).is_some());
        }
        assert!(registry.contains(&ViewId::new("users")));
        assert!(registry.resolve(&ViewId::new("users")).is_none());
    }

    #[test]
    fn test_default_reload_falls_back_to_redraw() {
        let widget = CountingWidget::default();
        assert!(!widget.supports_reload());
        widget.reload_keeping_position();
        assert_eq!(widget.redraws.load(Ordering::SeqCst), 1);
    }
}

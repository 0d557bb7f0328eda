//! Event Bus - one-way broadcast channel for coordinator events
//!
//! The EventBus uses a tokio broadcast channel to deliver events to all
//! subscribers. The coordinator emits, external collaborators subscribe.

use tokio::sync::broadcast;
use tracing::debug;

use super::types::{CoordEvent, RefreshMode};
use crate::domain::{FilterSet, ViewId};

/// Default channel capacity (events)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1_024;

/// Broadcast bus for coordinator events
pub struct EventBus {
    tx: broadcast::Sender<CoordEvent>,
}

impl EventBus {
    /// Create a new event bus with the given capacity
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "EventBus::new: creating event bus");
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Create a new event bus with default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Emit an event to all subscribers
    ///
    /// This is fire-and-forget: if there are no subscribers, the event is dropped.
    /// If a subscriber falls behind, it loses the oldest events.
    pub fn emit(&self, event: CoordEvent) {
        debug!(event_type = event.event_type(), view_id = ?event.view_id(), "EventBus::emit");
        // Ignore send errors (no subscribers is OK)
        let _ = self.tx.send(event);
    }

    /// Subscribe to receive events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<CoordEvent> {
        debug!("EventBus::subscribe: new subscriber");
        self.tx.subscribe()
    }

    /// Create an emitter bound to one view
    pub fn emitter_for(&self, view_id: &ViewId) -> ViewEmitter {
        ViewEmitter {
            tx: self.tx.clone(),
            view_id: view_id.clone(),
        }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Handle for emitting events about a single view
///
/// Cheap to clone; fills in the view id on every event.
#[derive(Clone)]
pub struct ViewEmitter {
    tx: broadcast::Sender<CoordEvent>,
    view_id: ViewId,
}

impl ViewEmitter {
    pub fn view_id(&self) -> &ViewId {
        &self.view_id
    }

    fn emit(&self, event: CoordEvent) {
        debug!(event_type = event.event_type(), view_id = %self.view_id, "ViewEmitter::emit");
        let _ = self.tx.send(event);
    }

    /// Emit a filters applied event
    pub fn filters_applied(&self, filters: FilterSet) {
        self.emit(CoordEvent::FiltersApplied {
            view_id: self.view_id.clone(),
            filters,
        });
    }

    /// Emit a filters reset event
    pub fn filters_reset(&self) {
        self.emit(CoordEvent::FiltersReset {
            view_id: self.view_id.clone(),
        });
    }

    /// Emit a refresh complete event
    pub fn refresh_complete(&self, mode: RefreshMode) {
        self.emit(CoordEvent::RefreshComplete {
            view_id: self.view_id.clone(),
            mode,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_event_bus_subscribe() {
        let bus = EventBus::new(16);
        assert_eq!(bus.subscriber_count(), 0);
        let _rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(16);
        // Must not panic with nobody listening
        bus.emit(CoordEvent::CoordinatorReady);
    }

    #[tokio::test]
    async fn test_view_emitter() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let emitter = bus.emitter_for(&ViewId::new("logs"));

        emitter.filters_applied([("level", "error")].into_iter().collect());
        emitter.refresh_complete(RefreshMode::Reload);
        emitter.filters_reset();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.event_type(), "FiltersApplied");
        assert_eq!(first.view_id(), Some(&ViewId::new("logs")));

        assert_eq!(
            rx.recv().await.unwrap(),
            CoordEvent::RefreshComplete {
                view_id: ViewId::new("logs"),
                mode: RefreshMode::Reload,
            }
        );
        assert_eq!(rx.recv().await.unwrap().event_type(), "FiltersReset");
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(CoordEvent::CoordinatorReady);

        assert_eq!(rx1.recv().await.unwrap(), CoordEvent::CoordinatorReady);
        assert_eq!(rx2.recv().await.unwrap(), CoordEvent::CoordinatorReady);
    }
}

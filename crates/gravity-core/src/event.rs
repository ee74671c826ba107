//! Event bus for gravity using tokio::broadcast
//!
//! Replaces implicit re-rendering: the store announces every state change and
//! every refresh request here, and the TUI and refresher subscribe.

use crate::models::AlertsQuery;
use tokio::sync::broadcast;

/// Events emitted by the store and data layer
#[derive(Debug, Clone)]
pub enum AlertsEvent {
    /// The store applied an update; views should redraw
    StateChanged,
    /// Data for this query should be (re)fetched
    RefreshRequested(AlertsQuery),
    /// A payload was applied to the store
    DataLoaded { points: usize, anomalies: usize },
    /// Fetching failed; previous data stays in place
    LoadFailed(String),
    /// Watcher encountered an error
    WatcherError(String),
}

/// Event bus for broadcasting alerts events
pub struct EventBus {
    sender: broadcast::Sender<AlertsEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (256 events)
    pub fn default_capacity() -> Self {
        Self::new(256)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: AlertsEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<AlertsEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.publish(AlertsEvent::StateChanged);
        bus.publish(AlertsEvent::LoadFailed("boom".to_string()));

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(event1, AlertsEvent::StateChanged));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(event2, AlertsEvent::LoadFailed(msg) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::default_capacity();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(AlertsEvent::DataLoaded {
            points: 3,
            anomalies: 1,
        });

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();

        assert!(matches!(e1, AlertsEvent::DataLoaded { points: 3, .. }));
        assert!(matches!(e2, AlertsEvent::DataLoaded { anomalies: 1, .. }));
    }

    #[test]
    fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::default_capacity();
        bus.publish(AlertsEvent::StateChanged);
    }
}

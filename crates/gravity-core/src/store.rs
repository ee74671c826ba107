//! Alerts store: injectable state container with a pure reducer
//!
//! State lives behind a `parking_lot::RwLock`. Every mutation goes through
//! [`AlertsStore::dispatch`], which runs [`reduce`] under the write lock so
//! updates are applied in a single total order.

use crate::event::{AlertsEvent, EventBus};
use crate::intent::AlertsUpdate;
use crate::models::{AlertsState, CategoryType, DateRange};
use crate::reducer::reduce;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, trace};

/// Configuration for the alerts store
#[derive(Debug, Clone)]
pub struct AlertsStoreConfig {
    /// Range selected when the store is created
    pub default_range: DateRange,

    /// Category selected when the store is created
    pub default_category: CategoryType,

    /// Event bus channel capacity
    pub event_capacity: usize,
}

impl Default for AlertsStoreConfig {
    fn default() -> Self {
        Self {
            default_range: DateRange::LastWeek,
            default_category: CategoryType::All,
            event_capacity: 256,
        }
    }
}

/// Central state container for the Alerts tab
pub struct AlertsStore {
    state: RwLock<AlertsState>,
    event_bus: EventBus,
}

impl AlertsStore {
    /// Create a store holding `initial`
    pub fn new(initial: AlertsState, config: &AlertsStoreConfig) -> Self {
        Self {
            state: RwLock::new(initial),
            event_bus: EventBus::new(config.event_capacity),
        }
    }

    /// Create a store whose initial state is derived from `config` at `now`
    pub fn from_config(config: &AlertsStoreConfig, now: DateTime<Utc>) -> Self {
        let initial = AlertsState::at(now, config.default_range, config.default_category);
        Self::new(initial, config)
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::from_config(&AlertsStoreConfig::default(), Utc::now())
    }

    /// Get the event bus for subscribing to updates
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> AlertsState {
        self.state.read().clone()
    }

    /// Run `f` against the current state without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&AlertsState) -> R) -> R {
        f(&self.state.read())
    }

    /// Apply an update intent
    ///
    /// Publishes `StateChanged` for every applied intent, and
    /// `RefreshRequested` when the intent forces a reload or changes the
    /// fetch query (filter or bounds).
    pub fn dispatch(&self, update: AlertsUpdate) {
        if update.is_empty() {
            trace!("Ignoring empty update");
            return;
        }

        let fields = update.fields();
        let force_call = update.force_call;

        let (query_changed, query) = {
            let mut guard = self.state.write();
            let before = guard.query();
            let current = std::mem::take(&mut *guard);
            *guard = reduce(current, update);
            let after = guard.query();
            (before != after, after)
        };

        debug!(
            kind = AlertsUpdate::KIND,
            ?fields,
            force_call,
            query_changed,
            "Update applied"
        );

        self.event_bus.publish(AlertsEvent::StateChanged);

        if force_call || query_changed {
            debug!(filter = %query.filter, start = %query.start, end = %query.end, "Requesting refresh");
            self.event_bus.publish(AlertsEvent::RefreshRequested(query));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryFilter;
    use chrono::{Duration, TimeZone};
    use tokio::sync::broadcast::Receiver;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap()
    }

    fn store() -> AlertsStore {
        AlertsStore::from_config(&AlertsStoreConfig::default(), now())
    }

    fn drain(rx: &mut Receiver<AlertsEvent>) -> Vec<AlertsEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_initial_state_from_config() {
        let config = AlertsStoreConfig {
            default_range: DateRange::LastMonth,
            default_category: CategoryType::Complaint,
            ..Default::default()
        };
        let store = AlertsStore::from_config(&config, now());
        let state = store.snapshot();

        assert_eq!(state.selected_date_range, DateRange::LastMonth);
        assert_eq!(state.category_type, CategoryType::Complaint);
        assert_eq!(state.selected_date_start, now() - Duration::days(30));
    }

    #[test]
    fn test_force_call_requests_refresh() {
        let store = store();
        let mut rx = store.event_bus().subscribe();

        store.dispatch(AlertsUpdate::refresh());

        let events = drain(&mut rx);
        assert!(matches!(events[0], AlertsEvent::StateChanged));
        assert!(matches!(
            &events[1],
            AlertsEvent::RefreshRequested(q) if q.filter == CategoryFilter::All
        ));
        assert!(store.read(|s| s.refresh_pending));
    }

    #[test]
    fn test_range_marker_alone_does_not_refetch() {
        let store = store();
        let mut rx = store.event_bus().subscribe();

        store.dispatch(AlertsUpdate::new().date_range(DateRange::Custom));

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], AlertsEvent::StateChanged));
    }

    #[test]
    fn test_query_change_requests_refresh() {
        let store = store();
        let mut rx = store.event_bus().subscribe();

        store.dispatch(
            AlertsUpdate::new()
                .category_type(CategoryType::Ward)
                .ward(Some("4".to_string())),
        );

        let events = drain(&mut rx);
        assert!(events.iter().any(|e| matches!(
            e,
            AlertsEvent::RefreshRequested(q) if q.filter == CategoryFilter::Ward("4".to_string())
        )));
    }

    #[test]
    fn test_empty_update_publishes_nothing() {
        let store = store();
        let mut rx = store.event_bus().subscribe();

        store.dispatch(AlertsUpdate::new());

        assert!(drain(&mut rx).is_empty());
    }
}

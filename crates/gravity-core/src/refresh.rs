//! Background refresher: answers `RefreshRequested` events from a source
//!
//! Stands in for the fetch layer behind the Alerts tab. It listens on the
//! store's event bus, fetches the catalog and payload for the requested query
//! and dispatches them back as a single update.

use crate::error::CoreError;
use crate::event::AlertsEvent;
use crate::intent::AlertsUpdate;
use crate::models::{AlertsQuery, CategoryType};
use crate::panels;
use crate::source::{AlertsSource, Catalog};
use crate::store::AlertsStore;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Outcome of one refresh attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { points: usize, anomalies: usize },
    /// Filters moved on while fetching, or a restored category just got its
    /// first catalog entry; a newer request is already queued
    Stale,
    Failed(String),
}

/// Handle to the running refresher task
pub struct Refresher {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Refresher {
    /// Subscribe to `store` and serve refresh requests from `source`
    pub fn start<S: AlertsSource>(store: Arc<AlertsStore>, source: Arc<S>) -> Self {
        let mut event_rx = store.event_bus().subscribe();
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let handle = tokio::spawn(async move {
            info!("Refresher started");
            loop {
                tokio::select! {
                    event = event_rx.recv() => match event {
                        Ok(AlertsEvent::RefreshRequested(query)) => {
                            Self::refresh(&store, source.as_ref(), &query).await;
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Refresher lagged behind, fetching current query");
                            let query = store.read(|s| s.query());
                            Self::refresh(&store, source.as_ref(), &query).await;
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = shutdown_rx.recv() => {
                        info!("Refresher shutting down");
                        break;
                    }
                }
            }
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Fetch `query` from `source` and apply the result to `store`
    ///
    /// A ward or complaint category without a selection (restored from
    /// preferences before any catalog was known) first gets the catalog's
    /// first entry. That changes the query, so the outcome is `Stale` and the
    /// store has already requested the selected series.
    pub async fn refresh<S: AlertsSource>(
        store: &AlertsStore,
        source: &S,
        query: &AlertsQuery,
    ) -> RefreshOutcome {
        let catalog = match source.catalog().await {
            Ok(catalog) => catalog,
            Err(e) => return Self::fail(store, query, e),
        };

        if let Some(selection) = Self::initial_selection(store, &catalog) {
            debug!(filter = %query.filter, "Selecting first catalog entry for restored category");
            store.dispatch(AlertsUpdate {
                wards: Some(catalog.wards),
                complaint_types: Some(catalog.complaint_types),
                ..selection
            });
            return RefreshOutcome::Stale;
        }

        let payload = match source.fetch(query).await {
            Ok(payload) => payload,
            Err(e) => return Self::fail(store, query, e),
        };

        if store.read(|s| s.query()) != *query {
            debug!(filter = %query.filter, "Discarding stale payload");
            return RefreshOutcome::Stale;
        }

        let points = payload.data.len();
        let anomalies = payload.anomalies.len();

        store.dispatch(
            AlertsUpdate::new()
                .catalog(catalog.wards, catalog.complaint_types)
                .payload(payload, Utc::now()),
        );
        store
            .event_bus()
            .publish(AlertsEvent::DataLoaded { points, anomalies });

        debug!(filter = %query.filter, points, anomalies, "Refresh applied");
        RefreshOutcome::Applied { points, anomalies }
    }

    /// Report a failed load, keeping the data already in the store
    fn fail(store: &AlertsStore, query: &AlertsQuery, error: CoreError) -> RefreshOutcome {
        warn!(filter = %query.filter, error = %error, "Refresh failed");
        store.dispatch(AlertsUpdate::new().refresh_failed());
        store
            .event_bus()
            .publish(AlertsEvent::LoadFailed(error.to_string()));
        RefreshOutcome::Failed(error.to_string())
    }

    /// Selection for a ward/complaint category that has none yet
    fn initial_selection(store: &AlertsStore, catalog: &Catalog) -> Option<AlertsUpdate> {
        store.read(|s| {
            let available = match s.category_type {
                CategoryType::Ward if s.selected_ward.is_none() => &catalog.wards,
                CategoryType::Complaint if s.selected_complaint_type.is_none() => {
                    &catalog.complaint_types
                }
                _ => return None,
            };
            (!available.is_empty()).then(|| {
                panels::category_type_selected(
                    s.category_type,
                    &catalog.wards,
                    &catalog.complaint_types,
                )
            })
        })
    }

    /// Stop the refresher and wait for it to finish
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryFilter;
    use crate::source::JsonFileSource;
    use crate::store::AlertsStoreConfig;
    use chrono::{DateTime, TimeZone};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, 0, 0, 0).unwrap()
    }

    fn data_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
            "wards": ["8"],
            "complaint_types": ["Drainage"],
            "series": {{
                "all": {{
                    "data": [
                        {{"Time": "2026-04-08T00:00:00Z", "Data": 3}},
                        {{"Time": "2026-04-09T00:00:00Z", "Data": 11}}
                    ],
                    "anomalies": ["2026-04-09T00:00:00Z"]
                }},
                "ward:8": {{
                    "data": [{{"Time": "2026-04-09T00:00:00Z", "Data": 4}}],
                    "anomalies": []
                }}
            }}
        }}"#
        )
        .unwrap();
        file
    }

    fn store() -> Arc<AlertsStore> {
        Arc::new(AlertsStore::from_config(&AlertsStoreConfig::default(), now()))
    }

    #[tokio::test]
    async fn test_refresh_applies_payload_and_catalog() {
        let file = data_file();
        let store = store();
        let source = JsonFileSource::new(file.path());
        let query = store.read(|s| s.query());

        let outcome = Refresher::refresh(&store, &source, &query).await;

        assert_eq!(outcome, RefreshOutcome::Applied { points: 2, anomalies: 1 });
        let state = store.snapshot();
        assert_eq!(state.wards, vec!["8"]);
        assert_eq!(state.complaints_count, 14);
        assert_eq!(state.anomalies_count, 1);
        assert!(state.last_loaded.is_some());
    }

    #[tokio::test]
    async fn test_stale_payload_is_discarded() {
        let file = data_file();
        let store = store();
        let source = JsonFileSource::new(file.path());
        let query = store.read(|s| s.query());

        store.dispatch(
            AlertsUpdate::new()
                .category_type(CategoryType::Ward)
                .ward(Some("8".to_string())),
        );

        let outcome = Refresher::refresh(&store, &source, &query).await;
        assert_eq!(outcome, RefreshOutcome::Stale);
        assert!(store.read(|s| s.current_data.is_empty()));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_data() {
        let store = store();
        store.dispatch(AlertsUpdate::refresh());
        let mut rx = store.event_bus().subscribe();
        let source = JsonFileSource::new("/nonexistent/alerts.json");
        let query = store.read(|s| s.query());

        let outcome = Refresher::refresh(&store, &source, &query).await;

        assert!(matches!(outcome, RefreshOutcome::Failed(_)));
        assert!(!store.read(|s| s.refresh_pending));
        let failed = std::iter::from_fn(|| rx.try_recv().ok())
            .any(|e| matches!(e, AlertsEvent::LoadFailed(_)));
        assert!(failed);
    }

    #[tokio::test]
    async fn test_restored_category_selects_first_catalog_entry() {
        let file = data_file();
        let config = AlertsStoreConfig {
            default_category: CategoryType::Ward,
            ..AlertsStoreConfig::default()
        };
        let store = AlertsStore::from_config(&config, now());
        let mut rx = store.event_bus().subscribe();
        let source = JsonFileSource::new(file.path());

        let query = store.read(|s| s.query());
        assert_eq!(query.filter, CategoryFilter::All);

        let outcome = Refresher::refresh(&store, &source, &query).await;
        assert_eq!(outcome, RefreshOutcome::Stale);

        let state = store.snapshot();
        let ward = CategoryFilter::Ward("8".to_string());
        assert_eq!(state.selected_ward.as_deref(), Some("8"));
        assert_eq!(state.query().filter, ward);
        assert!(state.selection_consistent());

        let requested = std::iter::from_fn(|| rx.try_recv().ok())
            .find_map(|e| match e {
                AlertsEvent::RefreshRequested(q) => Some(q),
                _ => None,
            })
            .unwrap();
        assert_eq!(requested.filter, ward);

        let outcome = Refresher::refresh(&store, &source, &requested).await;
        assert_eq!(outcome, RefreshOutcome::Applied { points: 1, anomalies: 0 });
        assert_eq!(store.read(|s| s.complaints_count), 4);
    }

    #[tokio::test]
    async fn test_background_task_serves_force_call() {
        let file = data_file();
        let store = store();
        let mut rx = store.event_bus().subscribe();
        let refresher = Refresher::start(store.clone(), Arc::new(JsonFileSource::new(file.path())));

        store.dispatch(AlertsUpdate::refresh());

        let loaded = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Ok(AlertsEvent::DataLoaded { points, .. }) = rx.recv().await {
                    return points;
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(loaded, 2);
        assert!(!store.read(|s| s.refresh_pending));
        refresher.stop().await;
    }
}

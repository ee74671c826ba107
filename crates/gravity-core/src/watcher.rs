//! File watcher for the alerts data file
//!
//! Uses notify with adaptive debouncing. A change to the watched file is
//! turned into a `force_call` intent, so the refresher reloads it.

use crate::error::CoreError;
use crate::event::AlertsEvent;
use crate::intent::AlertsUpdate;
use crate::store::AlertsStore;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};

/// Configuration for the file watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Base debounce delay
    pub debounce_delay: Duration,

    /// Maximum debounce delay during burst
    pub max_debounce_delay: Duration,

    /// Burst detection threshold (events per second)
    pub burst_threshold: u32,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(500),
            max_debounce_delay: Duration::from_secs(3),
            burst_threshold: 10,
        }
    }
}

/// Watches the data file and requests a refresh when it changes
pub struct FileWatcher {
    /// Notify watcher instance
    _watcher: RecommendedWatcher,

    /// Shutdown signal
    shutdown_tx: mpsc::Sender<()>,
}

impl FileWatcher {
    /// Start watching `data_path`
    ///
    /// The parent directory is watched rather than the file itself, so
    /// exporters that replace the file by rename are still seen.
    pub async fn start(
        data_path: PathBuf,
        store: Arc<AlertsStore>,
        config: WatcherConfig,
    ) -> Result<Self, CoreError> {
        let (event_tx, mut event_rx) = mpsc::channel::<notify::Result<Event>>(100);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = event_tx.blocking_send(res);
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )
        .map_err(|e| CoreError::WatchError {
            message: "cannot create watcher".to_string(),
            source: Some(e),
        })?;

        let watch_dir = data_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| CoreError::WatchError {
                message: format!("cannot watch {}", watch_dir.display()),
                source: Some(e),
            })?;

        info!(path = %data_path.display(), "File watcher started");

        tokio::spawn(async move {
            let mut debounce_state = DebounceState::new(config);

            loop {
                tokio::select! {
                    Some(result) = event_rx.recv() => {
                        match result {
                            Ok(event) => {
                                if Self::is_data_change(&event, &data_path) && debounce_state.should_emit() {
                                    debug!(path = %data_path.display(), "Data file changed, requesting refresh");
                                    store.dispatch(AlertsUpdate::refresh());
                                }
                            }
                            Err(e) => {
                                error!(error = %e, "File watcher error");
                                store.event_bus().publish(AlertsEvent::WatcherError(e.to_string()));
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("File watcher shutting down");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            shutdown_tx,
        })
    }

    /// True for create/modify events touching `data_path`
    fn is_data_change(event: &Event, data_path: &Path) -> bool {
        match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) => {}
            _ => return false,
        }

        let file_name = data_path.file_name();
        let hit = event
            .paths
            .iter()
            .any(|p| p == data_path || (file_name.is_some() && p.file_name() == file_name));

        trace!(paths = ?event.paths, hit, "Processing file event");
        hit
    }

    /// Stop the watcher
    pub async fn stop(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Debounce state for adaptive debouncing
struct DebounceState {
    config: WatcherConfig,
    last_emit: Option<Instant>,
    event_count_window: VecDeque<Instant>,
}

impl DebounceState {
    fn new(config: WatcherConfig) -> Self {
        Self {
            config,
            last_emit: None,
            event_count_window: VecDeque::new(),
        }
    }

    fn should_emit(&mut self) -> bool {
        let now = Instant::now();

        // Track event rate for burst detection
        self.event_count_window.push_back(now);
        while self
            .event_count_window
            .front()
            .map(|t| now.duration_since(*t) > Duration::from_secs(1))
            .unwrap_or(false)
        {
            self.event_count_window.pop_front();
        }

        let delay = if self.event_count_window.len() as u32 > self.config.burst_threshold {
            self.config.max_debounce_delay
        } else {
            self.config.debounce_delay
        };

        if let Some(last) = self.last_emit {
            if now.duration_since(last) < delay {
                trace!("Debouncing data file event");
                return false;
            }
        }

        self.last_emit = Some(now);
        true
    }
}

//! TUI Application state and event loop

use crate::components::Spinner;
use crossterm::event::{KeyCode, KeyModifiers};
use gravity_core::{AlertsEvent, AlertsStore, AlertsUpdate, ColorScheme};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

/// TUI Application state
pub struct App {
    /// Store reference
    pub store: Arc<AlertsStore>,

    /// Event receiver for store updates
    pub event_rx: broadcast::Receiver<AlertsEvent>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// True until the first load completes or fails
    pub is_loading: bool,

    /// Error/warning message to display
    pub status_message: Option<String>,

    /// Spinner shown while loading
    pub spinner: Spinner,

    /// Active color scheme
    pub color_scheme: ColorScheme,
}

impl App {
    pub fn new(store: Arc<AlertsStore>, color_scheme: ColorScheme) -> Self {
        let event_rx = store.event_bus().subscribe();

        Self {
            store,
            event_rx,
            should_quit: false,
            is_loading: true,
            status_message: None,
            spinner: Spinner::new(),
            color_scheme,
        }
    }

    /// Handle keyboard input
    /// Returns true if the key was handled as a global key
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                true
            }
            KeyCode::F(5) => {
                self.store.dispatch(AlertsUpdate::refresh());
                true
            }
            KeyCode::Char('T') => {
                self.color_scheme = self.color_scheme.toggle();
                true
            }
            _ => false,
        }
    }

    /// Check for store events (non-blocking)
    pub fn poll_events(&mut self) {
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "UI event receiver lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn apply_event(&mut self, event: AlertsEvent) {
        match event {
            AlertsEvent::StateChanged | AlertsEvent::RefreshRequested(_) => {}
            AlertsEvent::DataLoaded { .. } => {
                self.is_loading = false;
                self.status_message = None;
            }
            AlertsEvent::LoadFailed(msg) => {
                warn!(error = %msg, "Alerts load failed");
                self.is_loading = false;
                self.status_message = Some(format!("Load failed: {}", msg));
            }
            AlertsEvent::WatcherError(msg) => {
                self.status_message = Some(format!("Watcher error: {}", msg));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Arc::new(AlertsStore::with_defaults()), ColorScheme::Dark)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(app.should_quit);

        let mut app = self::app();
        assert!(!app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_f5_dispatches_force_call() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::F(5), KeyModifiers::NONE));
        assert!(app.store.read(|s| s.refresh_pending));
    }

    #[test]
    fn test_theme_toggle() {
        let mut app = app();
        app.handle_key(KeyCode::Char('T'), KeyModifiers::SHIFT);
        assert_eq!(app.color_scheme, ColorScheme::Light);
    }

    #[test]
    fn test_poll_events_tracks_loading_and_errors() {
        let mut app = app();
        let bus = app.store.event_bus().clone();

        bus.publish(AlertsEvent::LoadFailed("file missing".to_string()));
        app.poll_events();
        assert!(!app.is_loading);
        assert_eq!(app.status_message.as_deref(), Some("Load failed: file missing"));

        bus.publish(AlertsEvent::DataLoaded {
            points: 3,
            anomalies: 1,
        });
        app.poll_events();
        assert!(app.status_message.is_none());
    }
}

//! Alerts tab: select panel on top, chart/table panel below

use super::chart_panel::ChartPanel;
use super::select_panel::SelectPanel;
use crossterm::event::KeyCode;
use gravity_core::models::{AlertsState, DateRange};
use gravity_core::panels::{self, AlertsTabProps};
use gravity_core::{AlertsStore, AlertsUpdate, ColorScheme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use tracing::debug;

/// Alerts tab state
///
/// Owns no alert data: every render reads the store snapshot and hands each
/// panel its slice through [`AlertsTabProps`].
pub struct AlertsTab {
    mounted: bool,
    select: SelectPanel,
    chart: ChartPanel,
}

impl Default for AlertsTab {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertsTab {
    pub fn new() -> Self {
        Self {
            mounted: false,
            select: SelectPanel::new(),
            chart: ChartPanel::new(),
        }
    }

    /// First display: request a load of the current filters
    ///
    /// Only the first call after construction or [`unmount`](Self::unmount)
    /// dispatches; later calls are no-ops.
    pub fn mount(&mut self, store: &AlertsStore) {
        if self.mounted {
            return;
        }
        debug!("Alerts tab mounted, requesting data");
        store.dispatch(AlertsUpdate::refresh());
        self.mounted = true;
    }

    /// Tab left: panel-local state starts over on the next mount
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.select = SelectPanel::new();
        self.chart = ChartPanel::new();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// True while a date field captures keystrokes
    pub fn is_editing(&self) -> bool {
        self.select.is_editing()
    }

    /// Route a key to the panels; the select panel gets first pick
    pub fn handle_key(&mut self, key: KeyCode, store: &AlertsStore) -> bool {
        if self.select.handle_key(key, store) {
            return true;
        }

        let content = store.read(|s| panels::derive(&AlertsTabProps::from_state(s).chart));
        self.chart.handle_key(key, &content)
    }

    /// Mouse moved over the tab
    pub fn handle_mouse_move(&mut self, column: u16, row: u16) -> bool {
        self.chart.hover_at(column, row)
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AlertsState,
        loading: bool,
        scheme: ColorScheme,
    ) {
        let props = AlertsTabProps::from_state(state);
        let custom = state.selected_date_range == DateRange::Custom;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SelectPanel::height(custom)),
                Constraint::Min(0),
            ])
            .split(area);

        self.select.render(frame, chunks[0], &props.select, scheme);
        self.chart
            .render(frame, chunks[1], &props.chart, loading, scheme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use gravity_core::models::{CategoryType, DataPoint};
    use gravity_core::{AlertsEvent, AlertsStoreConfig};
    use ratatui::{backend::TestBackend, Terminal};

    fn store() -> AlertsStore {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        AlertsStore::from_config(&AlertsStoreConfig::default(), now)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_mount_dispatches_once() {
        let store = store();
        let mut rx = store.event_bus().subscribe();
        let mut tab = AlertsTab::new();

        tab.mount(&store);
        tab.mount(&store);

        let mut refreshes = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, AlertsEvent::RefreshRequested(_)) {
                refreshes += 1;
            }
        }
        assert_eq!(refreshes, 1);
        assert!(tab.is_mounted());

        tab.unmount();
        tab.mount(&store);
        assert!(matches!(
            std::iter::from_fn(|| rx.try_recv().ok())
                .find(|e| matches!(e, AlertsEvent::RefreshRequested(_))),
            Some(_)
        ));
    }

    #[test]
    fn test_unmount_resets_view_mode() {
        let store = store();
        let mut tab = AlertsTab::new();
        tab.mount(&store);

        tab.handle_key(KeyCode::Char('v'), &store);
        assert_eq!(tab.chart.view_mode(), panels::ViewMode::Table);

        tab.unmount();
        assert_eq!(tab.chart.view_mode(), panels::ViewMode::Chart);
    }

    #[test]
    fn test_render_composes_both_panels() {
        let store = store();
        let end = store.read(|s| s.selected_date_end);
        store.dispatch(
            AlertsUpdate::new()
                .catalog(vec!["14".to_string()], vec!["Garbage".to_string()])
                .category_type(CategoryType::Ward)
                .ward(Some("14".to_string())),
        );
        let mut state = store.snapshot();
        state.current_data = vec![
            DataPoint::new(end - Duration::days(2), 3),
            DataPoint::new(end - Duration::days(1), 8),
        ];
        state.complaints_count = 11;

        let mut tab = AlertsTab::new();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|f| tab.render(f, f.area(), &state, false, ColorScheme::Dark))
            .unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("(•) Ward No."));
        assert!(text.contains("‹ 14 ›"));
        assert!(text.contains(" 7D "));
        assert!(text.contains("Complaints: 11 | Anomalies: 0"));
        assert!(!text.contains("Start"));
    }

    #[test]
    fn test_custom_range_shows_date_fields() {
        let store = store();
        for update in panels::date_range_selected(DateRange::Custom, Utc::now()) {
            store.dispatch(update);
        }
        let state = store.snapshot();

        let mut tab = AlertsTab::new();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|f| tab.render(f, f.area(), &state, false, ColorScheme::Dark))
            .unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("Start"));
        assert!(text.contains("2026-10-09"));
        assert!(text.contains("2026-10-16"));
    }
}

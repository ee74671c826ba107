//! TUI rendering logic

use crate::app::App;
use crate::tabs::AlertsTab;
use crate::theme::StatusColor;
use crossterm::event::KeyCode;
use gravity_core::models::AlertsState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Main UI renderer
pub struct Ui {
    alerts: AlertsTab,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    pub fn new() -> Self {
        Self {
            alerts: AlertsTab::new(),
        }
    }

    /// Show the Alerts tab, loading its data on first display
    pub fn mount(&mut self, app: &App) {
        self.alerts.mount(&app.store);
    }

    /// True while a tab captures raw keystrokes
    pub fn is_editing(&self) -> bool {
        self.alerts.is_editing()
    }

    /// Handle key input for the active tab
    /// Returns true if the tab consumed the key
    pub fn handle_tab_key(&mut self, key: KeyCode, app: &App) -> bool {
        self.alerts.handle_key(key, &app.store)
    }

    /// Handle mouse movement for the active tab
    pub fn handle_mouse_move(&mut self, column: u16, row: u16) -> bool {
        self.alerts.handle_mouse_move(column, row)
    }

    /// Render the full UI
    pub fn render(&mut self, frame: &mut Frame, app: &mut App) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(size);

        self.render_header(frame, chunks[0], app);

        let state = app.store.snapshot();
        self.alerts
            .render(frame, chunks[1], &state, app.is_loading, app.color_scheme);

        self.render_status_bar(frame, chunks[2], app, &state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, app: &App) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let focus = StatusColor::Focus.to_color(app.color_scheme);
        let header = Paragraph::new(Line::from(vec![
            Span::styled("◈ ", Style::default().fg(focus)),
            Span::styled("gravity", Style::default().fg(Color::White).bold()),
            Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                "Alerts",
                Style::default()
                    .fg(focus)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
        ]));
        frame.render_widget(header, inner);
    }

    fn render_status_bar(
        &self,
        frame: &mut Frame,
        area: Rect,
        app: &mut App,
        state: &AlertsState,
    ) {
        let status = if let Some(ref msg) = app.status_message {
            Line::from(vec![
                Span::styled(" ⚠ ", Style::default().fg(Color::Yellow).bold()),
                Span::styled(msg.as_str(), Style::default().fg(Color::Yellow)),
            ])
        } else {
            let mut spans = Vec::new();
            if app.is_loading || state.refresh_pending {
                let label = if app.is_loading { " loading " } else { " refreshing " };
                app.spinner.tick();
                spans.push(Span::raw(" "));
                spans.push(app.spinner.render());
                spans.push(Span::styled(label, Style::default().fg(Color::White)));
            } else {
                let loaded = state
                    .last_loaded
                    .map(|t| format!(" ● loaded {} UTC ", t.format("%H:%M:%S")))
                    .unwrap_or_else(|| " ○ not loaded ".to_string());
                spans.push(Span::styled(loaded, Style::default().fg(Color::Gray)));
            }

            let hint = if self.is_editing() {
                "type YYYY-MM-DD │ Enter apply │ Esc cancel"
            } else {
                "a/w/c category │ [ ] select │ 1-5 range │ v view │ ←→ hover │ F5 refresh │ T theme"
            };

            spans.push(Span::styled("│", Style::default().fg(Color::Gray)));
            spans.push(Span::styled(" q", Style::default().fg(Color::Cyan).bold()));
            spans.push(Span::styled(" quit ", Style::default().fg(Color::Gray)));
            spans.push(Span::styled("│", Style::default().fg(Color::Gray)));
            spans.push(Span::styled(format!(" {}", hint), Style::default().fg(Color::Gray)));
            Line::from(spans)
        };

        let bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gravity_core::{AlertsEvent, AlertsStore, ColorScheme};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

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
    fn test_render_header_and_status() {
        let mut app = App::new(Arc::new(AlertsStore::with_defaults()), ColorScheme::Dark);
        let mut ui = Ui::new();
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();

        terminal.draw(|f| ui.render(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("gravity"));
        assert!(text.contains("Alerts"));
        assert!(text.contains("loading"));

        app.store
            .event_bus()
            .publish(AlertsEvent::LoadFailed("boom".to_string()));
        app.poll_events();
        terminal.draw(|f| ui.render(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Load failed: boom"));
    }

    #[test]
    fn test_status_bar_shows_forced_reload() {
        let mut app = App::new(Arc::new(AlertsStore::with_defaults()), ColorScheme::Dark);
        let mut ui = Ui::new();
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();

        app.store.dispatch(
            gravity_core::AlertsUpdate::new()
                .payload(Default::default(), chrono::Utc::now()),
        );
        app.store
            .event_bus()
            .publish(AlertsEvent::DataLoaded { points: 0, anomalies: 0 });
        app.poll_events();

        app.store.dispatch(gravity_core::AlertsUpdate::refresh());
        terminal.draw(|f| ui.render(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("refreshing"));

        app.store
            .dispatch(gravity_core::AlertsUpdate::new().refresh_failed());
        terminal.draw(|f| ui.render(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(!text.contains("refreshing"));
        assert!(text.contains("● loaded"));
    }

    #[test]
    fn test_mount_requests_refresh() {
        let app = App::new(Arc::new(AlertsStore::with_defaults()), ColorScheme::Dark);
        let mut ui = Ui::new();

        ui.mount(&app);
        assert!(app.store.read(|s| s.refresh_pending));
    }
}

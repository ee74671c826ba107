//! Select panel: category radios, ward/complaint select, range buttons and
//! the custom date fields

use crate::components::DateField;
use crate::theme::{FocusStyle, StatusColor};
use chrono::Utc;
use crossterm::event::KeyCode;
use gravity_core::models::{CategoryType, DateRange};
use gravity_core::panels::{self, SelectPanelModel, SelectPanelProps};
use gravity_core::{AlertsStore, AlertsUpdate, ColorScheme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

/// Which custom date field is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Start,
    End,
}

/// Select panel state: only the in-progress date edits live here
pub struct SelectPanel {
    start: DateField,
    end: DateField,
    /// Parse error for the last committed field
    field_error: Option<(Field, String)>,
}

impl Default for SelectPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectPanel {
    pub fn new() -> Self {
        Self {
            start: DateField::new("Start"),
            end: DateField::new("End"),
            field_error: None,
        }
    }

    /// True while a date field captures keystrokes
    pub fn is_editing(&self) -> bool {
        self.start.active || self.end.active
    }

    /// Rows needed to draw the panel
    pub fn height(custom: bool) -> u16 {
        if custom {
            7
        } else {
            4
        }
    }

    /// Handle a key; returns true when it was consumed
    pub fn handle_key(&mut self, key: KeyCode, store: &AlertsStore) -> bool {
        if self.is_editing() {
            self.handle_edit_key(key, store);
            return true;
        }

        match key {
            KeyCode::Char('a') => {
                self.select_category(CategoryType::All, store);
                true
            }
            KeyCode::Char('w') => {
                self.select_category(CategoryType::Ward, store);
                true
            }
            KeyCode::Char('c') => {
                self.select_category(CategoryType::Complaint, store);
                true
            }
            KeyCode::Char('[') => self.step_select(-1, store),
            KeyCode::Char(']') => self.step_select(1, store),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = (c as usize) - ('1' as usize);
                match DateRange::all().get(idx) {
                    Some(&range) => {
                        self.field_error = None;
                        for update in panels::date_range_selected(range, Utc::now()) {
                            store.dispatch(update);
                        }
                        true
                    }
                    None => false,
                }
            }
            KeyCode::Char('s') => self.begin_edit(Field::Start, store),
            KeyCode::Char('e') => self.begin_edit(Field::End, store),
            _ => false,
        }
    }

    fn select_category(&mut self, category: CategoryType, store: &AlertsStore) {
        let update = store.read(|s| {
            panels::category_type_selected(category, &s.wards, &s.complaint_types)
        });
        store.dispatch(update);
    }

    fn step_select(&mut self, offset: isize, store: &AlertsStore) -> bool {
        let update: Option<AlertsUpdate> = store.read(|s| {
            let props = panels::AlertsTabProps::from_state(s).select;
            let control = props.model().select?;
            let option = control.step(offset)?;
            Some(control.choose(&option.value))
        });

        match update {
            Some(update) => {
                store.dispatch(update);
                true
            }
            None => false,
        }
    }

    fn begin_edit(&mut self, field: Field, store: &AlertsStore) -> bool {
        let custom = store.read(|s| {
            let props = panels::AlertsTabProps::from_state(s).select;
            props.model().custom_fields
        });
        let Some(fields) = custom else {
            return false;
        };

        match field {
            Field::Start => self.start.begin(&fields.start),
            Field::End => self.end.begin(&fields.end),
        }
        true
    }

    fn handle_edit_key(&mut self, key: KeyCode, store: &AlertsStore) {
        let (field, input) = if self.start.active {
            (Field::Start, &mut self.start)
        } else {
            (Field::End, &mut self.end)
        };

        match key {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => input.pop(),
            KeyCode::Esc => input.cancel(),
            KeyCode::Enter => {
                let value = input.commit();
                let parsed = match field {
                    Field::Start => panels::date_start_changed(&value),
                    Field::End => panels::date_end_changed(&value),
                };
                match parsed {
                    Ok(update) => {
                        self.field_error = None;
                        store.dispatch(update);
                    }
                    Err(e) => {
                        debug!(value = %value, error = %e, "Rejected custom date");
                        self.field_error = Some((field, "invalid date".to_string()));
                    }
                }
            }
            _ => {}
        }
    }

    /// Render the panel from its props
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        props: &SelectPanelProps<'_>,
        scheme: ColorScheme,
    ) {
        let model = props.model();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(FocusStyle::unfocused_border(scheme)))
            .title(" Filters ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
        if model.custom_fields.is_some() {
            constraints.push(Constraint::Length(3));
        }
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        frame.render_widget(
            Paragraph::new(Self::category_line(&model, scheme)),
            rows[0],
        );
        frame.render_widget(Paragraph::new(Self::range_line(&model, scheme)), rows[1]);

        if let Some(fields) = &model.custom_fields {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(24), Constraint::Length(24), Constraint::Min(0)])
                .split(rows[2]);

            let error_for = |f: Field| {
                self.field_error
                    .as_ref()
                    .filter(|(which, _)| *which == f)
                    .map(|(_, msg)| msg.as_str())
            };
            self.start
                .render(frame, cols[0], &fields.start, error_for(Field::Start), scheme);
            self.end
                .render(frame, cols[1], &fields.end, error_for(Field::End), scheme);
        }
    }

    fn category_line(model: &SelectPanelModel, scheme: ColorScheme) -> Line<'static> {
        let focus = StatusColor::Focus.to_color(scheme);
        let neutral = StatusColor::Neutral.to_color(scheme);
        let text = FocusStyle::text(scheme);

        let mut spans = Vec::new();
        for (radio, key) in model.categories.iter().zip(['a', 'w', 'c']) {
            let (mark, style) = if radio.checked {
                ("(•)", Style::default().fg(focus).add_modifier(Modifier::BOLD))
            } else {
                ("( )", Style::default().fg(text))
            };
            spans.push(Span::styled(format!(" {} {}", mark, radio.label), style));
            spans.push(Span::styled(format!(" [{}] ", key), Style::default().fg(neutral)));
        }

        if let Some(select) = &model.select {
            let value = select
                .value
                .as_deref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "none available".to_string());
            spans.push(Span::styled("│ ", Style::default().fg(neutral)));
            spans.push(Span::styled("‹ ", Style::default().fg(neutral)));
            spans.push(Span::styled(
                value,
                Style::default().fg(focus).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(" ›", Style::default().fg(neutral)));
            spans.push(Span::styled(
                format!("  [/] {} of {}", Self::position(select), select.options.len()),
                Style::default().fg(neutral),
            ));
        }

        Line::from(spans)
    }

    fn position(select: &panels::SelectControl) -> usize {
        select
            .value
            .as_deref()
            .and_then(|v| select.options.iter().position(|o| o.value == v))
            .map(|idx| idx + 1)
            .unwrap_or(0)
    }

    fn range_line(model: &SelectPanelModel, scheme: ColorScheme) -> Line<'static> {
        let focus = StatusColor::Focus.to_color(scheme);
        let neutral = StatusColor::Neutral.to_color(scheme);
        let text = FocusStyle::text(scheme);

        let mut spans = Vec::new();
        for (idx, button) in model.range_buttons.iter().enumerate() {
            let style = if button.active {
                Style::default()
                    .fg(focus)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(text)
            };
            spans.push(Span::styled(format!(" {}", idx + 1), Style::default().fg(neutral)));
            spans.push(Span::styled(format!(" {} ", button.label), style));
        }

        if model.custom_fields.is_some() {
            spans.push(Span::styled(
                "   s start │ e end │ Enter apply │ Esc cancel",
                Style::default().fg(neutral),
            ));
        }

        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gravity_core::models::AlertsState;
    use gravity_core::AlertsStoreConfig;
    use std::sync::Arc;

    fn store() -> Arc<AlertsStore> {
        let store = AlertsStore::new(AlertsState::default(), &AlertsStoreConfig::default());
        store.dispatch(AlertsUpdate::new().catalog(
            vec!["14".to_string(), "15".to_string()],
            vec!["Garbage".to_string()],
        ));
        Arc::new(store)
    }

    #[test]
    fn test_category_keys_reset_selection() {
        let store = store();
        let mut panel = SelectPanel::new();

        assert!(panel.handle_key(KeyCode::Char('w'), &store));
        let state = store.snapshot();
        assert_eq!(state.category_type, CategoryType::Ward);
        assert_eq!(state.selected_ward.as_deref(), Some("14"));

        assert!(panel.handle_key(KeyCode::Char('c'), &store));
        let state = store.snapshot();
        assert_eq!(state.selected_complaint_type.as_deref(), Some("Garbage"));
        assert_eq!(state.selected_ward, None);
    }

    #[test]
    fn test_bracket_keys_cycle_select() {
        let store = store();
        let mut panel = SelectPanel::new();

        assert!(!panel.handle_key(KeyCode::Char(']'), &store));

        panel.handle_key(KeyCode::Char('w'), &store);
        assert!(panel.handle_key(KeyCode::Char(']'), &store));
        assert_eq!(store.read(|s| s.selected_ward.clone()).as_deref(), Some("15"));

        panel.handle_key(KeyCode::Char(']'), &store);
        assert_eq!(store.read(|s| s.selected_ward.clone()).as_deref(), Some("14"));
    }

    #[test]
    fn test_number_keys_pick_range() {
        let store = store();
        let mut panel = SelectPanel::new();

        assert!(panel.handle_key(KeyCode::Char('3'), &store));
        let state = store.snapshot();
        assert_eq!(state.selected_date_range, DateRange::LastMonth);
        assert_eq!(
            state.selected_date_end - state.selected_date_start,
            chrono::Duration::days(30)
        );
    }

    #[test]
    fn test_custom_edit_commits_and_reports_errors() {
        let store = store();
        let mut panel = SelectPanel::new();

        assert!(!panel.handle_key(KeyCode::Char('s'), &store));

        panel.handle_key(KeyCode::Char('5'), &store);
        assert!(panel.handle_key(KeyCode::Char('s'), &store));
        assert!(panel.is_editing());

        for _ in 0..10 {
            panel.handle_key(KeyCode::Backspace, &store);
        }
        for c in "2026-01-02".chars() {
            panel.handle_key(KeyCode::Char(c), &store);
        }
        panel.handle_key(KeyCode::Enter, &store);
        assert!(!panel.is_editing());
        assert_eq!(field(&store), "2026-01-02");

        panel.handle_key(KeyCode::Char('e'), &store);
        for _ in 0..10 {
            panel.handle_key(KeyCode::Backspace, &store);
        }
        panel.handle_key(KeyCode::Char('9'), &store);
        panel.handle_key(KeyCode::Enter, &store);
        assert!(panel.field_error.is_some());
    }

    #[test]
    fn test_editing_captures_quit_key_characters() {
        let store = store();
        let mut panel = SelectPanel::new();
        panel.handle_key(KeyCode::Char('5'), &store);
        panel.handle_key(KeyCode::Char('e'), &store);

        assert!(panel.handle_key(KeyCode::Char('w'), &store));
        assert_eq!(store.read(|s| s.category_type), CategoryType::All);

        panel.handle_key(KeyCode::Esc, &store);
        assert!(!panel.is_editing());
    }

    fn field(store: &AlertsStore) -> String {
        store.read(|s| gravity_core::format::field_date(s.selected_date_start))
    }
}

//! Date text field for the custom range
//!
//! Stands in for a date picker: accepts `YYYY-MM-DD` keystrokes and hands the
//! text back on commit. Parsing happens in the select panel.

use crate::theme::{FocusStyle, StatusColor};
use gravity_core::ColorScheme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Longest accepted input, `YYYY-MM-DD`
const MAX_LEN: usize = 10;

/// Editable `YYYY-MM-DD` input for the custom date range
pub struct DateField {
    /// Title shown on the border
    pub label: &'static str,
    /// Text being edited
    pub input: String,
    /// Whether the field is being edited
    pub active: bool,
}

impl DateField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            input: String::new(),
            active: false,
        }
    }

    /// Start editing, pre-filled with the committed value
    pub fn begin(&mut self, current: &str) {
        self.input = current.to_string();
        self.active = true;
    }

    /// Accept digits and dashes only
    pub fn push(&mut self, c: char) {
        if self.input.len() < MAX_LEN && (c.is_ascii_digit() || c == '-') {
            self.input.push(c);
        }
    }

    pub fn pop(&mut self) {
        self.input.pop();
    }

    /// Stop editing and hand back the typed text
    pub fn commit(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.input)
    }

    /// Stop editing and drop the typed text
    pub fn cancel(&mut self) {
        self.active = false;
        self.input.clear();
    }

    /// Render the field; `committed` is shown while not editing
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        committed: &str,
        error: Option<&str>,
        scheme: ColorScheme,
    ) {
        let text = if self.active {
            self.input.as_str()
        } else {
            committed
        };

        let border_color = if error.is_some() {
            StatusColor::Error.to_color(scheme)
        } else if self.active {
            FocusStyle::focused_border(scheme)
        } else {
            FocusStyle::unfocused_border(scheme)
        };
        let text_color = FocusStyle::text(scheme);

        let mut spans = vec![Span::styled(
            text.to_string(),
            Style::default().fg(text_color),
        )];
        if self.active {
            spans.push(Span::styled(
                "_",
                Style::default()
                    .fg(FocusStyle::focused_border(scheme))
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        let title = match error {
            Some(msg) => format!(" {} · {} ", self.label, msg),
            None => format!(" {} ", self.label),
        };

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(text_color)
                        .add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_prefills_and_commit_takes() {
        let mut field = DateField::new("Start");
        field.begin("2026-10-01");
        assert!(field.active);

        field.pop();
        field.push('5');
        assert_eq!(field.commit(), "2026-10-05");
        assert!(!field.active);
        assert!(field.input.is_empty());
    }

    #[test]
    fn test_rejects_letters_and_overflow() {
        let mut field = DateField::new("End");
        field.begin("");
        for c in "2026-1x0-161".chars() {
            field.push(c);
        }
        assert_eq!(field.input, "2026-10-16");
    }

    #[test]
    fn test_render_follows_color_scheme() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut field = DateField::new("Start");
        field.begin("2026-10-01");
        let mut terminal = Terminal::new(TestBackend::new(24, 3)).unwrap();

        for scheme in [ColorScheme::Dark, ColorScheme::Light] {
            terminal
                .draw(|f| field.render(f, f.area(), "", None, scheme))
                .unwrap();
            let buffer = terminal.backend().buffer();
            assert_eq!(buffer[(0, 0)].fg, FocusStyle::focused_border(scheme));
            assert_eq!(buffer[(1, 1)].symbol(), "2");
            assert_eq!(buffer[(1, 1)].fg, FocusStyle::text(scheme));
        }

        field.cancel();
        terminal
            .draw(|f| field.render(f, f.area(), "2026-10-01", Some("invalid date"), ColorScheme::Light))
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(0, 0)].fg, StatusColor::Error.to_color(ColorScheme::Light));
    }

    #[test]
    fn test_cancel_discards_input() {
        let mut field = DateField::new("End");
        field.begin("2026-10-16");
        field.cancel();
        assert!(!field.active);
        assert!(field.input.is_empty());
    }
}

//! Reusable empty state components with actionable hints
//!
//! Provides consistent empty state patterns for the chart panel,
//! inspired by lazygit's informative empty states.

use gravity_core::panels::RangeError;
use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

/// Builder for empty state messages
pub struct EmptyState {
    title: String,
    title_color: Color,
    message: Vec<String>,
    actions: Vec<(String, String)>, // (key, description)
}

impl EmptyState {
    /// Create new empty state with title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_color: Color::Yellow,
            message: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Override the title color
    pub fn title_color(mut self, color: Color) -> Self {
        self.title_color = color;
        self
    }

    /// Add a message line
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message.push(msg.into());
        self
    }

    /// Add an action hint
    pub fn action(mut self, key: impl Into<String>, description: impl Into<String>) -> Self {
        self.actions.push((key.into(), description.into()));
        self
    }

    /// Build the paragraph widget
    pub fn build(self) -> Paragraph<'static> {
        let mut lines = Vec::new();

        // Empty line for spacing
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled(
            self.title,
            Style::default().fg(self.title_color),
        )));

        lines.push(Line::from(""));

        for msg in self.message {
            lines.push(Line::from(Span::styled(
                msg,
                Style::default().fg(Color::DarkGray),
            )));
        }

        if !self.actions.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Actions:",
                Style::default().fg(Color::Cyan),
            )));

            for (key, desc) in self.actions {
                lines.push(Line::from(vec![
                    Span::styled("  [", Style::default().fg(Color::DarkGray)),
                    Span::styled(key, Style::default().fg(Color::Green)),
                    Span::styled("] ", Style::default().fg(Color::DarkGray)),
                    Span::styled(desc, Style::default().fg(Color::White)),
                ]));
            }
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    }
}

/// Valid range, but nothing recorded inside it
pub fn no_data(showing: String, notice: &'static str) -> Paragraph<'static> {
    EmptyState::new(notice)
        .message(showing)
        .action("1-4", "Pick a wider range")
        .action("F5", "Refresh")
        .build()
}

/// Range rejected before filtering
pub fn invalid_range(err: RangeError) -> Paragraph<'static> {
    let hint = match err {
        RangeError::StartNotBeforeEnd => "Move the start date before the end date",
        RangeError::ExceedsOneYear => "Pick a range of at most one year",
    };

    EmptyState::new(capitalize(&err.to_string()))
        .title_color(Color::Red)
        .message(hint)
        .action("s", "Edit start date")
        .action("e", "Edit end date")
        .build()
}

pub fn loading() -> Paragraph<'static> {
    EmptyState::new("Loading...")
        .message("Fetching alerts...")
        .build()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

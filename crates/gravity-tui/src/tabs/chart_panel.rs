//! Chart and table panel: complaint series with anomaly markers, hover
//! tooltip, and the anomaly list

use crate::empty_state;
use crate::theme::{point_color, FocusStyle, StatusColor};
use chrono::{DateTime, Utc};
use crossterm::event::KeyCode;
use gravity_core::panels::{self, ChartPanelProps, PanelContent, PanelData, ViewMode};
use gravity_core::ColorScheme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table,
        TableState,
    },
    Frame,
};

/// Rows under the plot taken by the x axis line and its labels
const X_AXIS_ROWS: u16 = 2;

/// Geometry of the last rendered plot, used to map mouse positions to points
#[derive(Debug, Clone)]
struct PlotArea {
    area: Rect,
    start: f64,
    end: f64,
    times: Vec<f64>,
}

impl PlotArea {
    fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    /// Index of the point nearest to `column`
    fn nearest(&self, column: u16) -> Option<usize> {
        if self.area.width == 0 {
            return None;
        }
        let frac = f64::from(column - self.area.x) / f64::from(self.area.width);
        let at = self.start + frac * (self.end - self.start);

        self.times
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - at).abs().total_cmp(&(*b - at).abs()))
            .map(|(idx, _)| idx)
    }

    /// Column of `time` inside the plot
    fn column_of(&self, time: f64) -> u16 {
        let span = (self.end - self.start).max(1.0);
        let frac = ((time - self.start) / span).clamp(0.0, 1.0);
        self.area.x + (frac * f64::from(self.area.width.saturating_sub(1))) as u16
    }
}

/// Chart and table panel state
///
/// The view mode and the hovered point are local to the panel and never reach
/// the store.
pub struct ChartPanel {
    view_mode: ViewMode,
    hover: Option<usize>,
    table_state: TableState,
    plot: Option<PlotArea>,
}

impl Default for ChartPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartPanel {
    pub fn new() -> Self {
        Self {
            view_mode: ViewMode::default(),
            hover: None,
            table_state: TableState::default(),
            plot: None,
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Index of the hovered point in the filtered series
    pub fn hovered(&self) -> Option<usize> {
        self.hover
    }

    pub fn toggle_view(&mut self) {
        self.view_mode = self.view_mode.toggled();
        self.hover = None;
        self.table_state.select(None);
    }

    /// Handle a key against the current content; returns true when consumed
    pub fn handle_key(&mut self, key: KeyCode, content: &PanelContent) -> bool {
        if key == KeyCode::Char('v') {
            self.toggle_view();
            return true;
        }

        let Some(data) = content.data() else {
            return false;
        };

        match self.view_mode {
            ViewMode::Chart => match key {
                KeyCode::Right | KeyCode::Char('l') => {
                    self.hover_step(1, data.points.len());
                    true
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    self.hover_step(-1, data.points.len());
                    true
                }
                KeyCode::Esc if self.hover.is_some() => {
                    self.hover = None;
                    true
                }
                _ => false,
            },
            ViewMode::Table => match key {
                KeyCode::Down | KeyCode::Char('j') => {
                    self.scroll(1, data.rows.len());
                    true
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.scroll(-1, data.rows.len());
                    true
                }
                _ => false,
            },
        }
    }

    fn hover_step(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.hover = None;
            return;
        }
        let next = match self.hover {
            Some(idx) => (idx as isize + offset).clamp(0, len as isize - 1) as usize,
            None if offset >= 0 => 0,
            None => len - 1,
        };
        self.hover = Some(next);
    }

    fn scroll(&mut self, offset: isize, len: usize) {
        if len == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(idx) => (idx as isize + offset).clamp(0, len as isize - 1) as usize,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    /// Mouse moved to (`column`, `row`): hover the nearest point, or clear
    /// the hover when the pointer leaves the plot
    pub fn hover_at(&mut self, column: u16, row: u16) -> bool {
        if self.view_mode != ViewMode::Chart {
            return false;
        }
        let next = match &self.plot {
            Some(plot) if plot.contains(column, row) => plot.nearest(column),
            _ => None,
        };
        let changed = next != self.hover;
        self.hover = next;
        changed
    }

    /// Render the panel for `props`
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: &ChartPanelProps<'_>,
        loading: bool,
        scheme: ColorScheme,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(FocusStyle::unfocused_border(scheme)))
            .title(Span::styled(
                format!(" {} ", props.title()),
                Style::default()
                    .fg(FocusStyle::text(scheme))
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let content = panels::derive(props);
        self.render_stats(frame, chunks[0], props, &content, scheme);

        match &content {
            PanelContent::Invalid(err) => {
                self.reset_hover();
                frame.render_widget(empty_state::invalid_range(*err), chunks[1]);
            }
            PanelContent::Empty { .. } => {
                self.reset_hover();
                let widget = if loading {
                    empty_state::loading()
                } else {
                    match content.empty_message() {
                        Some((showing, notice)) => empty_state::no_data(showing, notice),
                        None => empty_state::loading(),
                    }
                };
                frame.render_widget(widget, chunks[1]);
            }
            PanelContent::Ready(data) => match self.view_mode {
                ViewMode::Chart => self.render_chart(frame, chunks[1], props, data, scheme),
                ViewMode::Table => {
                    self.plot = None;
                    self.render_table(frame, chunks[1], data, scheme)
                }
            },
        }
    }

    fn reset_hover(&mut self) {
        self.hover = None;
        self.plot = None;
    }

    fn render_stats(
        &self,
        frame: &mut Frame,
        area: Rect,
        props: &ChartPanelProps<'_>,
        content: &PanelContent,
        scheme: ColorScheme,
    ) {
        let neutral = StatusColor::Neutral.to_color(scheme);
        let mut spans = vec![Span::styled(
            format!(" {}", props.stats_line()),
            Style::default().fg(FocusStyle::text(scheme)),
        )];

        if content.data().is_some() {
            spans.push(Span::styled("   │ ", Style::default().fg(neutral)));
            spans.push(Span::styled(
                "v ",
                Style::default()
                    .fg(StatusColor::Focus.to_color(scheme))
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                self.view_mode.toggle_label(),
                Style::default()
                    .fg(StatusColor::Focus.to_color(scheme))
                    .add_modifier(Modifier::UNDERLINED),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_chart(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: &ChartPanelProps<'_>,
        data: &PanelData,
        scheme: ColorScheme,
    ) {
        if self.hover.is_some_and(|idx| idx >= data.points.len()) {
            self.hover = None;
        }

        let start = timestamp(props.selected_date_start);
        let end = timestamp(props.selected_date_end);
        let y_max = (data.max_count().max(1) as f64) * 1.1;

        let series: Vec<(f64, f64)> = data
            .points
            .iter()
            .map(|p| (timestamp(p.time), p.count as f64))
            .collect();

        // Vertical annotation per anomaly
        let marker_lines: Vec<[(f64, f64); 2]> = data
            .markers
            .iter()
            .map(|m| {
                let x = timestamp(m.date);
                [(x, 0.0), (x, y_max)]
            })
            .collect();

        let tooltip = self.hover.and_then(|idx| data.tooltip(idx));
        let hovered: Vec<(f64, f64)> = tooltip
            .iter()
            .map(|t| (timestamp(t.time), t.value as f64))
            .collect();

        let alert_color = StatusColor::Error.to_color(scheme);
        let mut datasets = vec![Dataset::default()
            .name("Complaints")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(StatusColor::Focus.to_color(scheme)))
            .data(&series)];

        for (idx, line) in marker_lines.iter().enumerate() {
            let mut dataset = Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(alert_color))
                .data(line);
            if idx == 0 {
                dataset = dataset.name("Anomaly");
            }
            datasets.push(dataset);
        }

        if let Some(t) = &tooltip {
            // Alert points draw with the heavier block marker
            let marker = if t.is_alert() {
                symbols::Marker::Block
            } else {
                symbols::Marker::Dot
            };
            datasets.push(
                Dataset::default()
                    .marker(marker)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(point_color(t.style, scheme)))
                    .data(&hovered),
            );
        }

        let x_labels = vec![
            Span::raw(axis_date(props.selected_date_start)),
            Span::raw(axis_date(mid(props.selected_date_start, props.selected_date_end))),
            Span::raw(axis_date(props.selected_date_end)),
        ];
        let y_labels: Vec<String> = vec![
            "0".to_string(),
            format!("{}", (y_max / 2.0) as u64),
            format!("{}", y_max as u64),
        ];
        let y_label_width = y_labels.iter().map(|l| l.len()).max().unwrap_or(1) as u16;

        let axis_style = Style::default().fg(StatusColor::Neutral.to_color(scheme));
        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .style(axis_style)
                    .labels(x_labels)
                    .bounds([start, end]),
            )
            .y_axis(
                Axis::default()
                    .style(axis_style)
                    .labels(y_labels.into_iter().map(Span::raw).collect::<Vec<_>>())
                    .bounds([0.0, y_max]),
            );

        frame.render_widget(chart, area);

        let plot = PlotArea {
            area: Rect {
                x: area.x + y_label_width + 1,
                y: area.y,
                width: area.width.saturating_sub(y_label_width + 1),
                height: area.height.saturating_sub(X_AXIS_ROWS),
            },
            start,
            end,
            times: series.iter().map(|(x, _)| *x).collect(),
        };

        if let Some(t) = tooltip {
            let mut lines = Vec::new();
            if let Some(badge) = t.badge() {
                lines.push(Line::from(Span::styled(
                    badge,
                    Style::default().fg(alert_color).add_modifier(Modifier::BOLD),
                )));
            }
            lines.push(Line::from(Span::styled(
                t.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("Complaints: {}", t.value)));

            let width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 2;
            let height = lines.len() as u16 + 2;
            let point_col = plot.column_of(timestamp(t.time));

            // Right of the point when it fits, otherwise left of it
            let x = if point_col + 2 + width <= area.x + area.width {
                point_col + 2
            } else {
                point_col.saturating_sub(width + 1).max(area.x)
            };
            let popup = Rect {
                x,
                y: plot.area.y,
                width: width.min(area.width),
                height: height.min(area.height),
            };

            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(lines).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(point_color(t.style, scheme))),
                ),
                popup,
            );
        }

        self.plot = Some(plot);
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, data: &PanelData, scheme: ColorScheme) {
        if data.rows.is_empty() {
            frame.render_widget(
                empty_state::EmptyState::new("No anomalies in the selected range")
                    .action("v", "Show chart")
                    .build(),
                area,
            );
            return;
        }

        let header_style = Style::default()
            .fg(StatusColor::Focus.to_color(scheme))
            .add_modifier(Modifier::BOLD);
        let header = Row::new(vec![
            Cell::from("Time").style(header_style),
            Cell::from("Number of Complaints").style(header_style),
        ]);

        let rows: Vec<Row> = data
            .rows
            .iter()
            .map(|row| {
                let count = row
                    .count
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string());
                Row::new(vec![
                    Cell::from(row.date.clone()),
                    Cell::from(count).style(
                        Style::default().fg(StatusColor::Error.to_color(scheme)),
                    ),
                ])
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(32), Constraint::Min(20)])
            .header(header)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

fn timestamp(date: DateTime<Utc>) -> f64 {
    date.timestamp() as f64
}

fn mid(start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    start + (end - start) / 2
}

fn axis_date(date: DateTime<Utc>) -> String {
    date.format("%b %d").to_string()
}

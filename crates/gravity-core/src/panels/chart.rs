//! Chart and table panel: range validation, filtering and anomaly lookup
//!
//! [`derive`] turns the panel props into one of three outcomes: an inline
//! validation error, an empty-state message, or the filtered series with its
//! anomaly markers and table rows. The view mode is local to the panel and
//! never feeds back into the derivation.

use crate::format::{day_title, table_date, tooltip_date};
use crate::models::{Anomaly, DataPoint};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Longest range the panel will chart
pub const MAX_RANGE_DAYS: i64 = 365;

/// Date range rejected before any filtering
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("start date should come before end date")]
    StartNotBeforeEnd,

    #[error("selected range exceeds one year")]
    ExceedsOneYear,
}

/// Check the ordering first, then the length
///
/// The length counts whole days only, so a partial 366th day still passes.
pub fn validate_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), RangeError> {
    if start >= end {
        return Err(RangeError::StartNotBeforeEnd);
    }
    if (end - start).num_days() > MAX_RANGE_DAYS {
        return Err(RangeError::ExceedsOneYear);
    }
    Ok(())
}

/// Slice of state the chart panel reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPanelProps<'a> {
    pub selected_date_start: DateTime<Utc>,
    pub selected_date_end: DateTime<Utc>,
    pub data: &'a [DataPoint],
    pub anomalies: &'a [Anomaly],
    pub complaints_count: u64,
    pub anomalies_count: u64,
}

impl ChartPanelProps<'_> {
    /// `Tue Oct 13 2026 - Fri Oct 16 2026`
    pub fn title(&self) -> String {
        format!(
            "{} - {}",
            day_title(self.selected_date_start),
            day_title(self.selected_date_end)
        )
    }

    /// `Complaints: 120 | Anomalies: 3`
    pub fn stats_line(&self) -> String {
        format!(
            "Complaints: {} | Anomalies: {}",
            self.complaints_count, self.anomalies_count
        )
    }
}

/// Chart annotation for one anomaly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub date: DateTime<Utc>,
    pub label: String,
}

/// Anomaly table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyRow {
    pub time: DateTime<Utc>,
    /// Formatted for display
    pub date: String,
    /// Complaint count at the anomaly, if the series has a point there
    pub count: Option<u64>,
}

/// Filtered series plus everything derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelData {
    pub points: Vec<DataPoint>,
    pub markers: Vec<Marker>,
    pub rows: Vec<AnomalyRow>,
    anomaly_dates: HashSet<DateTime<Utc>>,
}

impl PanelData {
    /// Exact timestamp match against the in-range anomalies
    pub fn is_anomaly(&self, time: DateTime<Utc>) -> bool {
        self.anomaly_dates.contains(&time)
    }

    /// Tooltip for the point at `index` of the filtered series
    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        self.points
            .get(index)
            .map(|point| Tooltip::for_point(point, self.is_anomaly(point.time)))
    }

    /// Largest count in the filtered series
    pub fn max_count(&self) -> u64 {
        self.points.iter().map(|p| p.count).max().unwrap_or(0)
    }
}

/// Result of deriving the panel from its props
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    /// Range failed validation; nothing was filtered
    Invalid(RangeError),
    /// Valid range without data points
    Empty {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Ready(PanelData),
}

impl PanelContent {
    pub fn data(&self) -> Option<&PanelData> {
        match self {
            PanelContent::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// Empty-state lines: `Showing data from ... to ...` and the notice
    pub fn empty_message(&self) -> Option<(String, &'static str)> {
        match self {
            PanelContent::Empty { start, end } => Some((
                format!("Showing data from {} to {}", day_title(*start), day_title(*end)),
                "No data available for the selected date",
            )),
            _ => None,
        }
    }
}

/// Derive the panel content for `props`
pub fn derive(props: &ChartPanelProps<'_>) -> PanelContent {
    let start = props.selected_date_start;
    let end = props.selected_date_end;

    if let Err(err) = validate_range(start, end) {
        return PanelContent::Invalid(err);
    }

    let points: Vec<DataPoint> = props
        .data
        .iter()
        .filter(|p| p.within(start, end))
        .copied()
        .collect();

    if points.is_empty() {
        return PanelContent::Empty { start, end };
    }

    let date_to_count: HashMap<_, _> = points.iter().map(|p| (p.time, p.count)).collect();

    let in_range: Vec<Anomaly> = props
        .anomalies
        .iter()
        .filter(|a| **a >= start && **a <= end)
        .copied()
        .collect();

    let markers = in_range
        .iter()
        .map(|&date| Marker {
            date,
            label: String::new(),
        })
        .collect();

    let rows = in_range
        .iter()
        .map(|&time| AnomalyRow {
            time,
            date: table_date(time),
            count: date_to_count.get(&time).copied(),
        })
        .collect();

    PanelContent::Ready(PanelData {
        points,
        markers,
        rows,
        anomaly_dates: in_range.into_iter().collect(),
    })
}

/// Which view the panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Chart,
    Table,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Chart => ViewMode::Table,
            ViewMode::Table => ViewMode::Chart,
        }
    }

    /// Caption of the toggle link
    pub fn toggle_label(&self) -> &'static str {
        match self {
            ViewMode::Chart => "List anomalies",
            ViewMode::Table => "Show chart",
        }
    }
}

/// Rollover styling of the hovered point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointStyle {
    Alert,
    Normal,
}

impl PointStyle {
    /// Stroke and fill colour
    pub fn hex(&self) -> &'static str {
        match self {
            PointStyle::Alert => "#f00",
            PointStyle::Normal => "#ffd300",
        }
    }

    pub fn radius(&self) -> f64 {
        match self {
            PointStyle::Alert => 4.0,
            PointStyle::Normal => 2.5,
        }
    }
}

/// Floating tooltip for a hovered data point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub time: DateTime<Utc>,
    pub title: String,
    pub value: u64,
    pub style: PointStyle,
}

impl Tooltip {
    /// Build the tooltip for the point handed over by the chart
    pub fn for_point(point: &DataPoint, is_anomaly: bool) -> Self {
        Self {
            time: point.time,
            title: tooltip_date(point.time),
            value: point.count,
            style: if is_anomaly {
                PointStyle::Alert
            } else {
                PointStyle::Normal
            },
        }
    }

    pub fn is_alert(&self) -> bool {
        self.style == PointStyle::Alert
    }

    /// Prefix shown before the date for anomalies
    pub fn badge(&self) -> Option<&'static str> {
        self.is_alert().then_some("(ALERT)")
    }
}

//! Shared alerts state and the fetch query derived from it

use super::filter::{CategoryType, DateRange};
use super::series::{Anomaly, DataPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything the Alerts tab reads from the store
///
/// Only the reducer writes to this; views receive clones or borrowed slices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsState {
    pub wards: Vec<String>,
    pub complaint_types: Vec<String>,

    pub category_type: CategoryType,
    pub selected_ward: Option<String>,
    pub selected_complaint_type: Option<String>,

    pub selected_date_range: DateRange,
    pub selected_date_start: DateTime<Utc>,
    pub selected_date_end: DateTime<Utc>,

    pub current_data: Vec<DataPoint>,
    pub current_anomalies: Vec<Anomaly>,
    pub anomalies_count: u64,
    pub complaints_count: u64,

    /// Set by a `force_call` intent, cleared when the reload lands or fails
    pub refresh_pending: bool,
    /// When the last payload was applied
    pub last_loaded: Option<DateTime<Utc>>,
}

impl AlertsState {
    /// Empty state whose bounds follow `range` relative to `now`
    ///
    /// A custom range has no keyword to derive bounds from, so it starts out
    /// covering the last week.
    pub fn at(now: DateTime<Utc>, range: DateRange, category_type: CategoryType) -> Self {
        let (start, end) = range
            .bounds_at(now)
            .or_else(|| DateRange::LastWeek.bounds_at(now))
            .unwrap_or((now, now));

        Self {
            wards: Vec::new(),
            complaint_types: Vec::new(),
            category_type,
            selected_ward: None,
            selected_complaint_type: None,
            selected_date_range: range,
            selected_date_start: start,
            selected_date_end: end,
            current_data: Vec::new(),
            current_anomalies: Vec::new(),
            anomalies_count: 0,
            complaints_count: 0,
            refresh_pending: false,
            last_loaded: None,
        }
    }

    /// The query a data source should answer for this state
    pub fn query(&self) -> AlertsQuery {
        let filter = match self.category_type {
            CategoryType::All => CategoryFilter::All,
            CategoryType::Ward => self
                .selected_ward
                .clone()
                .map(CategoryFilter::Ward)
                .unwrap_or(CategoryFilter::All),
            CategoryType::Complaint => self
                .selected_complaint_type
                .clone()
                .map(CategoryFilter::Complaint)
                .unwrap_or(CategoryFilter::All),
        };

        AlertsQuery {
            filter,
            start: self.selected_date_start,
            end: self.selected_date_end,
        }
    }

    /// True if the ward/complaint selection agrees with the category type
    pub fn selection_consistent(&self) -> bool {
        match self.category_type {
            CategoryType::All => {
                self.selected_ward.is_none() && self.selected_complaint_type.is_none()
            }
            CategoryType::Ward => self.selected_complaint_type.is_none(),
            CategoryType::Complaint => self.selected_ward.is_none(),
        }
    }
}

impl Default for AlertsState {
    fn default() -> Self {
        Self::at(Utc::now(), DateRange::default(), CategoryType::default())
    }
}

/// Category part of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    All,
    Ward(String),
    Complaint(String),
}

impl CategoryFilter {
    /// Key used to look a series up in the data file
    pub fn key(&self) -> String {
        match self {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Ward(ward) => format!("ward:{}", ward),
            CategoryFilter::Complaint(kind) => format!("complaint:{}", kind),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// What to fetch: a category filter and a time window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertsQuery {
    pub filter: CategoryFilter,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

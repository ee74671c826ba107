//! Update intents dispatched to the alerts store
//!
//! An `AlertsUpdate` carries any subset of the state fields. Absent fields are
//! left alone by the reducer. Nullable selections use `Option<Option<_>>` so
//! "clear the ward" and "don't touch the ward" stay distinguishable.

use crate::models::{AlertsPayload, Anomaly, CategoryType, DataPoint, DateRange};
use chrono::{DateTime, Utc};

/// Typed counterpart of an `ALERTS_UPDATE_STATE` action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertsUpdate {
    pub wards: Option<Vec<String>>,
    pub complaint_types: Option<Vec<String>>,
    pub category_type: Option<CategoryType>,
    pub selected_ward: Option<Option<String>>,
    pub selected_complaint_type: Option<Option<String>>,
    pub selected_date_range: Option<DateRange>,
    pub selected_date_start: Option<DateTime<Utc>>,
    pub selected_date_end: Option<DateTime<Utc>>,
    pub current_data: Option<Vec<DataPoint>>,
    pub current_anomalies: Option<Vec<Anomaly>>,
    pub anomalies_count: Option<u64>,
    pub complaints_count: Option<u64>,
    /// Time the carried payload was fetched
    pub loaded_at: Option<DateTime<Utc>>,
    /// Ask the data layer to reload
    pub force_call: bool,
    /// The last reload failed; prior data stays
    pub refresh_failed: bool,
}

impl AlertsUpdate {
    /// Action type name used in logs
    pub const KIND: &'static str = "ALERTS_UPDATE_STATE";

    pub fn new() -> Self {
        Self::default()
    }

    /// Intent that only requests a data refresh
    pub fn refresh() -> Self {
        Self::new().force_call()
    }

    pub fn force_call(mut self) -> Self {
        self.force_call = true;
        self
    }

    /// Settle a pending refresh that produced no payload
    pub fn refresh_failed(mut self) -> Self {
        self.refresh_failed = true;
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.selected_date_range = Some(range);
        self
    }

    pub fn date_start(mut self, start: DateTime<Utc>) -> Self {
        self.selected_date_start = Some(start);
        self
    }

    pub fn date_end(mut self, end: DateTime<Utc>) -> Self {
        self.selected_date_end = Some(end);
        self
    }

    pub fn date_bounds(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.date_start(start).date_end(end)
    }

    pub fn category_type(mut self, category_type: CategoryType) -> Self {
        self.category_type = Some(category_type);
        self
    }

    pub fn ward(mut self, ward: Option<String>) -> Self {
        self.selected_ward = Some(ward);
        self
    }

    pub fn complaint_type(mut self, complaint_type: Option<String>) -> Self {
        self.selected_complaint_type = Some(complaint_type);
        self
    }

    pub fn catalog(mut self, wards: Vec<String>, complaint_types: Vec<String>) -> Self {
        self.wards = Some(wards);
        self.complaint_types = Some(complaint_types);
        self
    }

    /// Carry a fetched payload along with its derived counts
    pub fn payload(mut self, payload: AlertsPayload, loaded_at: DateTime<Utc>) -> Self {
        self.complaints_count = Some(payload.complaints_count());
        self.anomalies_count = Some(payload.anomalies_count());
        self.current_data = Some(payload.data);
        self.current_anomalies = Some(payload.anomalies);
        self.loaded_at = Some(loaded_at);
        self
    }

    /// True if the intent would change nothing
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty() && !self.force_call && !self.refresh_failed
    }

    /// Names of the state fields this intent sets
    pub fn fields(&self) -> Vec<&'static str> {
        let present = [
            ("wards", self.wards.is_some()),
            ("complaint_types", self.complaint_types.is_some()),
            ("categoryType", self.category_type.is_some()),
            ("selected_ward", self.selected_ward.is_some()),
            ("selected_complaint_type", self.selected_complaint_type.is_some()),
            ("selected_date_range", self.selected_date_range.is_some()),
            ("selected_date_start", self.selected_date_start.is_some()),
            ("selected_date_end", self.selected_date_end.is_some()),
            ("current_data", self.current_data.is_some()),
            ("current_anomalies", self.current_anomalies.is_some()),
            ("anomalies_count", self.anomalies_count.is_some()),
            ("complaints_count", self.complaints_count.is_some()),
        ];

        present
            .into_iter()
            .filter_map(|(name, set)| set.then_some(name))
            .collect()
    }
}

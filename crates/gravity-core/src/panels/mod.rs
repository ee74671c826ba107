//! Front-end independent logic behind the Alerts tab panels

pub mod chart;
pub mod select;

pub use chart::{
    derive, validate_range, AnomalyRow, ChartPanelProps, Marker, PanelContent, PanelData,
    PointStyle, RangeError, Tooltip, ViewMode, MAX_RANGE_DAYS,
};
pub use select::{
    category_type_selected, complaint_type_selected, date_end_changed, date_range_selected,
    date_start_changed, ward_selected, SelectControl, SelectPanelModel, SelectPanelProps,
};

use crate::models::AlertsState;

/// Props handed from the tab to its two panels
///
/// Borrowed straight out of the state; nothing is copied or reshaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertsTabProps<'a> {
    pub select: SelectPanelProps<'a>,
    pub chart: ChartPanelProps<'a>,
}

impl<'a> AlertsTabProps<'a> {
    pub fn from_state(state: &'a AlertsState) -> Self {
        Self {
            select: SelectPanelProps {
                wards: &state.wards,
                complaint_types: &state.complaint_types,
                selected_ward: state.selected_ward.as_deref(),
                selected_complaint_type: state.selected_complaint_type.as_deref(),
                selected_date_range: state.selected_date_range,
                selected_date_start: state.selected_date_start,
                selected_date_end: state.selected_date_end,
                category_type: state.category_type,
            },
            chart: ChartPanelProps {
                selected_date_start: state.selected_date_start,
                selected_date_end: state.selected_date_end,
                data: &state.current_data,
                anomalies: &state.current_anomalies,
                complaints_count: state.complaints_count,
                anomalies_count: state.anomalies_count,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryType, DataPoint, DateRange};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_props_forward_state_unchanged() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap();
        let mut state = AlertsState::at(now, DateRange::LastMonth, CategoryType::Complaint);
        state.complaint_types = vec!["Water".to_string()];
        state.selected_complaint_type = Some("Water".to_string());
        state.current_data = vec![DataPoint::new(now, 2)];
        state.complaints_count = 2;

        let props = AlertsTabProps::from_state(&state);

        assert_eq!(props.select.selected_complaint_type, Some("Water"));
        assert_eq!(props.select.category_type, CategoryType::Complaint);
        assert_eq!(props.chart.data, state.current_data.as_slice());
        assert_eq!(props.chart.selected_date_end, now);
        assert_eq!(props.chart.complaints_count, 2);
    }
}

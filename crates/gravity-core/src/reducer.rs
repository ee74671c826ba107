//! Pure reducer for `AlertsUpdate` intents

use crate::intent::AlertsUpdate;
use crate::models::AlertsState;

/// Apply `update` to `state`, returning the next state
///
/// Fields absent from the intent are carried over unchanged. Applying a
/// payload or a failure clears a pending refresh; `force_call` sets one.
pub fn reduce(mut state: AlertsState, update: AlertsUpdate) -> AlertsState {
    let AlertsUpdate {
        wards,
        complaint_types,
        category_type,
        selected_ward,
        selected_complaint_type,
        selected_date_range,
        selected_date_start,
        selected_date_end,
        current_data,
        current_anomalies,
        anomalies_count,
        complaints_count,
        loaded_at,
        force_call,
        refresh_failed,
    } = update;

    if let Some(wards) = wards {
        state.wards = wards;
    }
    if let Some(complaint_types) = complaint_types {
        state.complaint_types = complaint_types;
    }
    if let Some(category_type) = category_type {
        state.category_type = category_type;
    }
    if let Some(ward) = selected_ward {
        state.selected_ward = ward;
    }
    if let Some(complaint_type) = selected_complaint_type {
        state.selected_complaint_type = complaint_type;
    }
    if let Some(range) = selected_date_range {
        state.selected_date_range = range;
    }
    if let Some(start) = selected_date_start {
        state.selected_date_start = start;
    }
    if let Some(end) = selected_date_end {
        state.selected_date_end = end;
    }
    if let Some(data) = current_data {
        state.current_data = data;
    }
    if let Some(anomalies) = current_anomalies {
        state.current_anomalies = anomalies;
    }
    if let Some(count) = anomalies_count {
        state.anomalies_count = count;
    }
    if let Some(count) = complaints_count {
        state.complaints_count = count;
    }
    if let Some(at) = loaded_at {
        state.last_loaded = Some(at);
        state.refresh_pending = false;
    }
    if refresh_failed {
        state.refresh_pending = false;
    }
    if force_call {
        state.refresh_pending = true;
    }

    state
}

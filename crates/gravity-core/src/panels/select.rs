//! Select panel: filter controls and the intents they emit
//!
//! Everything here is a pure function of props. The front-end renders
//! [`SelectPanelModel`] and dispatches whatever the handlers return.

use crate::error::CoreError;
use crate::format::{field_date, parse_field_date};
use crate::intent::AlertsUpdate;
use crate::models::{CategoryType, DateRange};
use chrono::{DateTime, Utc};
use tracing::warn;

/// Slice of state the select panel reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectPanelProps<'a> {
    pub wards: &'a [String],
    pub complaint_types: &'a [String],
    pub selected_ward: Option<&'a str>,
    pub selected_complaint_type: Option<&'a str>,
    pub selected_date_range: DateRange,
    pub selected_date_start: DateTime<Utc>,
    pub selected_date_end: DateTime<Utc>,
    pub category_type: CategoryType,
}

/// One category radio button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioOption {
    pub category: CategoryType,
    pub label: &'static str,
    pub checked: bool,
}

/// One entry of the ward / complaint type select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Ward or complaint type select, shown only for those categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    pub category: CategoryType,
    pub options: Vec<SelectOption>,
    pub value: Option<String>,
}

impl SelectControl {
    /// Option `offset` steps away from the current value, wrapping around
    ///
    /// With no current value, stepping forward lands on the first option and
    /// stepping back on the last.
    pub fn step(&self, offset: isize) -> Option<&SelectOption> {
        let len = self.options.len() as isize;
        if len == 0 {
            return None;
        }

        let current = self
            .value
            .as_deref()
            .and_then(|v| self.options.iter().position(|o| o.value == v));

        let next = match current {
            Some(idx) => (idx as isize + offset).rem_euclid(len),
            None if offset >= 0 => 0,
            None => len - 1,
        };
        self.options.get(next as usize)
    }

    /// Intent for choosing `value` in this control
    pub fn choose(&self, value: &str) -> AlertsUpdate {
        match self.category {
            CategoryType::Complaint => complaint_type_selected(value),
            _ => ward_selected(value),
        }
    }
}

/// One date range button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeButton {
    pub range: DateRange,
    pub label: &'static str,
    pub active: bool,
}

/// Pre-filled custom date fields, shown only for the custom range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFields {
    pub start: String,
    pub end: String,
}

/// Everything needed to draw the select panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectPanelModel {
    pub categories: Vec<RadioOption>,
    pub select: Option<SelectControl>,
    pub range_buttons: Vec<RangeButton>,
    pub custom_fields: Option<CustomFields>,
}

impl SelectPanelProps<'_> {
    pub fn model(&self) -> SelectPanelModel {
        let categories = CategoryType::all()
            .iter()
            .map(|&category| RadioOption {
                category,
                label: category.label(),
                checked: category == self.category_type,
            })
            .collect();

        let to_options = |values: &[String]| {
            values
                .iter()
                .map(|v| SelectOption {
                    value: v.clone(),
                    label: v.clone(),
                })
                .collect::<Vec<_>>()
        };

        let select = match self.category_type {
            CategoryType::All => None,
            CategoryType::Ward => Some(SelectControl {
                category: CategoryType::Ward,
                options: to_options(self.wards),
                value: self.selected_ward.map(str::to_string),
            }),
            CategoryType::Complaint => Some(SelectControl {
                category: CategoryType::Complaint,
                options: to_options(self.complaint_types),
                value: self.selected_complaint_type.map(str::to_string),
            }),
        };

        let range_buttons = DateRange::all()
            .iter()
            .map(|&range| RangeButton {
                range,
                label: range.label(),
                active: range == self.selected_date_range,
            })
            .collect();

        let custom_fields = (self.selected_date_range == DateRange::Custom).then(|| CustomFields {
            start: field_date(self.selected_date_start),
            end: field_date(self.selected_date_end),
        });

        SelectPanelModel {
            categories,
            select,
            range_buttons,
            custom_fields,
        }
    }
}

/// Range button click
///
/// Dispatch order matters: the range marker goes first, then the bounds.
/// Custom only sets the marker and leaves the bounds for the date fields.
pub fn date_range_selected(range: DateRange, now: DateTime<Utc>) -> Vec<AlertsUpdate> {
    let mut updates = vec![AlertsUpdate::new().date_range(range)];
    if let Some((start, end)) = range.bounds_at(now) {
        updates.push(AlertsUpdate::new().date_bounds(start, end));
    }
    updates
}

/// Category radio change
///
/// Ward and complaint reset the selection to the first available entry.
/// With an empty list there is no first entry and the selection is cleared.
pub fn category_type_selected(
    category: CategoryType,
    wards: &[String],
    complaint_types: &[String],
) -> AlertsUpdate {
    let update = AlertsUpdate::new().category_type(category);
    match category {
        CategoryType::Ward => {
            let first = wards.first().cloned();
            if first.is_none() {
                warn!("No wards available, ward selection left empty");
            }
            update.ward(first).complaint_type(None)
        }
        CategoryType::Complaint => {
            let first = complaint_types.first().cloned();
            if first.is_none() {
                warn!("No complaint types available, selection left empty");
            }
            update.complaint_type(first).ward(None)
        }
        CategoryType::All => update.ward(None).complaint_type(None),
    }
}

/// Ward chosen in the select; clears the complaint type
pub fn ward_selected(ward: &str) -> AlertsUpdate {
    AlertsUpdate::new()
        .ward(Some(ward.to_string()))
        .complaint_type(None)
}

/// Complaint type chosen in the select; clears the ward
pub fn complaint_type_selected(complaint_type: &str) -> AlertsUpdate {
    AlertsUpdate::new()
        .ward(None)
        .complaint_type(Some(complaint_type.to_string()))
}

/// Custom start field edited (`YYYY-MM-DD`)
pub fn date_start_changed(value: &str) -> Result<AlertsUpdate, CoreError> {
    Ok(AlertsUpdate::new().date_start(parse_field_date(value)?))
}

/// Custom end field edited (`YYYY-MM-DD`)
pub fn date_end_changed(value: &str) -> Result<AlertsUpdate, CoreError> {
    Ok(AlertsUpdate::new().date_end(parse_field_date(value)?))
}

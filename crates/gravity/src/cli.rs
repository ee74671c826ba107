//! Non-interactive commands: anomaly listing and catalog
//!
//! Drives the same store, intents and panel derivation as the Alerts tab, then
//! prints the result as a table or JSON.

use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use gravity_core::error::CoreError;
use gravity_core::models::{AlertsState, CategoryType, DateRange};
use gravity_core::panels::{self, AlertsTabProps, PanelContent, RangeError};
use gravity_core::{AlertsUpdate, Catalog};
use serde_json::json;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum CliError {
    InvalidRange(RangeError),
    UnknownValue {
        field: &'static str,
        value: String,
        available: String,
    },
    Core(CoreError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::InvalidRange(e) => write!(f, "Invalid range: {}", e),
            CliError::UnknownValue {
                field,
                value,
                available,
            } => {
                write!(f, "Unknown {} '{}'. Available: {}", field, value, available)
            }
            CliError::Core(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<CoreError> for CliError {
    fn from(e: CoreError) -> Self {
        CliError::Core(e)
    }
}

impl From<RangeError> for CliError {
    fn from(e: RangeError) -> Self {
        CliError::InvalidRange(e)
    }
}

// ============================================================================
// Intent Builders
// ============================================================================

/// Range intents for `--range` / `--start` / `--end`
///
/// Explicit dates switch to the custom range; a missing bound keeps the one
/// from the relative `range`.
pub fn range_updates(
    range: DateRange,
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Vec<AlertsUpdate>, CliError> {
    if start.is_none() && end.is_none() {
        return Ok(panels::date_range_selected(range, now));
    }

    let mut updates = Vec::new();
    if let Some((s, e)) = range.bounds_at(now) {
        updates.push(AlertsUpdate::new().date_bounds(s, e));
    }
    updates.extend(panels::date_range_selected(DateRange::Custom, now));
    if let Some(start) = start {
        updates.push(panels::date_start_changed(start)?);
    }
    if let Some(end) = end {
        updates.push(panels::date_end_changed(end)?);
    }
    Ok(updates)
}

/// Category intent for `--ward` / `--complaint`, checked against `catalog`
pub fn category_update(
    catalog: &Catalog,
    ward: Option<&str>,
    complaint: Option<&str>,
) -> Result<AlertsUpdate, CliError> {
    let check = |field, value: &str, available: &[String]| {
        if available.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(CliError::UnknownValue {
                field,
                value: value.to_string(),
                available: join_or_none(available),
            })
        }
    };

    match (ward, complaint) {
        (Some(ward), _) => {
            check("ward", ward, &catalog.wards)?;
            Ok(AlertsUpdate {
                category_type: Some(CategoryType::Ward),
                ..panels::ward_selected(ward)
            })
        }
        (None, Some(complaint)) => {
            check("complaint type", complaint, &catalog.complaint_types)?;
            Ok(AlertsUpdate {
                category_type: Some(CategoryType::Complaint),
                ..panels::complaint_type_selected(complaint)
            })
        }
        (None, None) => Ok(panels::category_type_selected(
            CategoryType::All,
            &catalog.wards,
            &catalog.complaint_types,
        )),
    }
}

// ============================================================================
// Formatters
// ============================================================================

/// Format the anomaly listing for `state` as table (human) or JSON
pub fn format_alerts(state: &AlertsState, json: bool, no_color: bool) -> Result<String, CliError> {
    let props = AlertsTabProps::from_state(state).chart;
    let content = panels::derive(&props);

    if let PanelContent::Invalid(err) = content {
        return Err(err.into());
    }

    if json {
        let anomalies: Vec<_> = content
            .data()
            .map(|data| {
                data.rows
                    .iter()
                    .map(|row| {
                        json!({
                            "time": row.time,
                            "date": row.date,
                            "count": row.count,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let doc = json!({
            "filter": state.query().filter.key(),
            "start": state.selected_date_start,
            "end": state.selected_date_end,
            "complaints_count": state.complaints_count,
            "anomalies_count": state.anomalies_count,
            "points": content.data().map(|d| d.points.len()).unwrap_or(0),
            "anomalies": anomalies,
        });
        return Ok(serde_json::to_string_pretty(&doc).unwrap_or_else(|_| "{}".to_string()));
    }

    let mut lines = vec![
        format!("{}  [{}]", props.title(), state.query().filter),
        props.stats_line(),
        String::new(),
    ];

    let data = match &content {
        PanelContent::Ready(data) => data,
        _ => {
            if let Some((showing, notice)) = content.empty_message() {
                lines.push(notice.to_string());
                lines.push(showing);
            }
            return Ok(lines.join("\n"));
        }
    };

    if data.rows.is_empty() {
        lines.push("No anomalies in the selected range.".to_string());
        return Ok(lines.join("\n"));
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    // Apply colors only if enabled
    if no_color {
        table.set_header(vec!["Time", "Number of Complaints"]);
    } else {
        table.set_header(vec![
            Cell::new("Time").fg(Color::Cyan),
            Cell::new("Number of Complaints").fg(Color::Cyan),
        ]);
    }

    for row in &data.rows {
        let count = row
            .count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        if no_color {
            table.add_row(Row::from(vec![row.date.clone(), count]));
        } else {
            table.add_row(vec![Cell::new(&row.date), Cell::new(count).fg(Color::Red)]);
        }
    }

    lines.push(table.to_string());
    Ok(lines.join("\n"))
}

/// Format the catalog as table (human) or JSON
pub fn format_catalog(catalog: &Catalog, json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(catalog).unwrap_or_else(|_| "{}".to_string());
    }

    if catalog.wards.is_empty() && catalog.complaint_types.is_empty() {
        return "No wards or complaint types found.".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if no_color {
        table.set_header(vec!["Ward No.", "Complaint type"]);
    } else {
        table.set_header(vec![
            Cell::new("Ward No.").fg(Color::Cyan),
            Cell::new("Complaint type").fg(Color::Cyan),
        ]);
    }

    let rows = catalog.wards.len().max(catalog.complaint_types.len());
    for idx in 0..rows {
        let ward = catalog.wards.get(idx).map(String::as_str).unwrap_or("");
        let complaint = catalog
            .complaint_types
            .get(idx)
            .map(String::as_str)
            .unwrap_or("");
        table.add_row(Row::from(vec![ward, complaint]));
    }

    table.to_string()
}

// ============================================================================
// Utilities
// ============================================================================

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Filter dimensions: category type and date range keyword

use crate::error::CoreError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which dimension complaints are filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    #[default]
    All,
    Ward,
    Complaint,
}

impl CategoryType {
    pub fn all() -> &'static [CategoryType] {
        &[CategoryType::All, CategoryType::Ward, CategoryType::Complaint]
    }

    /// Wire value, as carried in update intents
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::All => "all",
            CategoryType::Ward => "ward",
            CategoryType::Complaint => "complaint",
        }
    }

    /// Radio button label
    pub fn label(&self) -> &'static str {
        match self {
            CategoryType::All => "All",
            CategoryType::Ward => "Ward No.",
            CategoryType::Complaint => "Complaint type",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CategoryType::All),
            "ward" => Ok(CategoryType::Ward),
            "complaint" => Ok(CategoryType::Complaint),
            other => Err(CoreError::InvalidValue {
                field: "category type",
                value: other.to_string(),
            }),
        }
    }
}

/// Date range keyword selected by the range buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    LastDay,
    #[default]
    LastWeek,
    LastMonth,
    LastYear,
    Custom,
}

impl DateRange {
    pub fn all() -> &'static [DateRange] {
        &[
            DateRange::LastDay,
            DateRange::LastWeek,
            DateRange::LastMonth,
            DateRange::LastYear,
            DateRange::Custom,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::LastDay => "last_day",
            DateRange::LastWeek => "last_week",
            DateRange::LastMonth => "last_month",
            DateRange::LastYear => "last_year",
            DateRange::Custom => "custom",
        }
    }

    /// Button caption
    pub fn label(&self) -> &'static str {
        match self {
            DateRange::LastDay => "1D",
            DateRange::LastWeek => "7D",
            DateRange::LastMonth => "30D",
            DateRange::LastYear => "YTD",
            DateRange::Custom => "Custom",
        }
    }

    /// Length in days for relative keywords, `None` for custom
    pub fn days(&self) -> Option<i64> {
        match self {
            DateRange::LastDay => Some(1),
            DateRange::LastWeek => Some(7),
            DateRange::LastMonth => Some(30),
            DateRange::LastYear => Some(365),
            DateRange::Custom => None,
        }
    }

    /// Bounds ending at `now`; `None` for custom ranges
    pub fn bounds_at(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.days().map(|days| (now - Duration::days(days), now))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateRange::all()
            .iter()
            .copied()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| CoreError::InvalidValue {
                field: "date range",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_relative_bounds() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();

        let (start, end) = DateRange::LastWeek.bounds_at(now).unwrap();
        assert_eq!(end, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 9, 12, 0, 0).unwrap());

        let (start, _) = DateRange::LastYear.bounds_at(now).unwrap();
        assert_eq!(now - start, Duration::days(365));

        assert!(DateRange::Custom.bounds_at(now).is_none());
    }

    #[test]
    fn test_parse_round_trips_wire_values() {
        for range in DateRange::all() {
            assert_eq!(range.as_str().parse::<DateRange>().unwrap(), *range);
        }
        for category in CategoryType::all() {
            assert_eq!(category.as_str().parse::<CategoryType>().unwrap(), *category);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "fortnight".parse::<DateRange>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidValue { field: "date range", .. }));
        assert!("district".parse::<CategoryType>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&DateRange::LastMonth).unwrap();
        assert_eq!(json, "\"last_month\"");
        let category: CategoryType = serde_json::from_str("\"complaint\"").unwrap();
        assert_eq!(category, CategoryType::Complaint);
    }
}

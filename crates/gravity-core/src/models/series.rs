//! Complaint count series and anomaly timestamps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp flagged as anomalous by the data source
pub type Anomaly = DateTime<Utc>;

/// Raw complaint count at a point in time
///
/// Field names follow the backend payload (`{"Time": ..., "Data": ...}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "Data")]
    pub count: u64,
}

impl DataPoint {
    pub fn new(time: DateTime<Utc>, count: u64) -> Self {
        Self { time, count }
    }

    /// True if `start <= time <= end`
    pub fn within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.time >= start && self.time <= end
    }
}

/// Series and anomalies returned for one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsPayload {
    #[serde(default)]
    pub data: Vec<DataPoint>,
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
}

impl AlertsPayload {
    /// Total complaints across the payload
    pub fn complaints_count(&self) -> u64 {
        self.data.iter().map(|p| p.count).sum()
    }

    pub fn anomalies_count(&self) -> u64 {
        self.anomalies.len() as u64
    }

    /// Keep only points and anomalies within `[start, end]`
    pub fn clipped(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            data: self
                .data
                .iter()
                .filter(|p| p.within(start, end))
                .copied()
                .collect(),
            anomalies: self
                .anomalies
                .iter()
                .filter(|a| **a >= start && **a <= end)
                .copied()
                .collect(),
        }
    }
}

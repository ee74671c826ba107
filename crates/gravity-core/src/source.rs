//! Data sources answering alerts queries
//!
//! The bundled source reads a JSON document:
//!
//! ```json
//! {
//!   "wards": ["1", "2"],
//!   "complaint_types": ["Garbage"],
//!   "series": {
//!     "all":               { "data": [{"Time": "...", "Data": 5}], "anomalies": ["..."] },
//!     "ward:1":            { "data": [], "anomalies": [] },
//!     "complaint:Garbage": { "data": [], "anomalies": [] }
//!   }
//! }
//! ```

use crate::error::{CoreError, LoadError, LoadReport};
use crate::models::{AlertsPayload, AlertsQuery};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Wards and complaint types available for filtering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub wards: Vec<String>,
    #[serde(default)]
    pub complaint_types: Vec<String>,
}

/// Something that can answer alerts queries
pub trait AlertsSource: Send + Sync + 'static {
    /// Filter values the select panel offers
    fn catalog(&self) -> impl Future<Output = Result<Catalog, CoreError>> + Send;

    /// Series and anomalies for `query`, limited to its time window
    fn fetch(
        &self,
        query: &AlertsQuery,
    ) -> impl Future<Output = Result<AlertsPayload, CoreError>> + Send;
}

/// On-disk document read by [`JsonFileSource`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsDocument {
    #[serde(flatten)]
    pub catalog: Catalog,
    #[serde(default)]
    pub series: HashMap<String, AlertsPayload>,
}

/// Source backed by a JSON file, re-read on every request
pub struct JsonFileSource {
    path: PathBuf,
    /// Maximum retry attempts
    max_retries: u32,
    /// Delay between retries
    retry_delay: Duration,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_retries: 3,
            retry_delay: Duration::from_millis(100),
        }
    }

    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, retrying parse failures
    ///
    /// The file may be caught mid-write by whatever exports it.
    pub async fn read_document(&self) -> Result<AlertsDocument, CoreError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(attempt, "Retrying alerts data read after delay");
                sleep(self.retry_delay).await;
            }

            match self.try_read().await {
                Ok(doc) => return Ok(doc),
                Err(e @ CoreError::FileNotFound { .. }) => return Err(e),
                Err(e) => {
                    warn!(attempt, error = %e, "Alerts data read attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::FileNotFound {
            path: self.path.clone(),
        }))
    }

    /// Single read attempt
    async fn try_read(&self) -> Result<AlertsDocument, CoreError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::FileNotFound {
                    path: self.path.clone(),
                }
            } else {
                CoreError::FileRead {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|e| CoreError::JsonParse {
            path: self.path.clone(),
            message: e.to_string(),
            source: e,
        })
    }

    fn payload_for(&self, doc: &AlertsDocument, query: &AlertsQuery) -> Result<AlertsPayload, CoreError> {
        let key = query.filter.key();
        let series = doc.series.get(&key).ok_or_else(|| CoreError::SeriesNotFound {
            key: key.clone(),
            path: self.path.clone(),
        })?;
        Ok(series.clipped(query.start, query.end))
    }

    /// Catalog and payload in one read, recording failures in `report`
    pub async fn load_graceful(
        &self,
        query: &AlertsQuery,
        report: &mut LoadReport,
    ) -> Option<(Catalog, AlertsPayload)> {
        let doc = match self.read_document().await {
            Ok(doc) => doc,
            Err(e) => {
                report.add_error(LoadError::from_core_error("data", &e));
                return None;
            }
        };
        report.catalog_loaded = true;

        let payload = match self.payload_for(&doc, query) {
            Ok(payload) => payload,
            Err(e) => {
                report.add_error(LoadError::from_core_error("series", &e));
                AlertsPayload::default()
            }
        };
        report.points_loaded += payload.data.len();
        report.anomalies_loaded += payload.anomalies.len();

        Some((doc.catalog, payload))
    }
}

impl AlertsSource for JsonFileSource {
    async fn catalog(&self) -> Result<Catalog, CoreError> {
        Ok(self.read_document().await?.catalog)
    }

    async fn fetch(&self, query: &AlertsQuery) -> Result<AlertsPayload, CoreError> {
        let doc = self.read_document().await?;
        let payload = self.payload_for(&doc, query)?;
        debug!(
            filter = %query.filter,
            points = payload.data.len(),
            anomalies = payload.anomalies.len(),
            "Fetched alerts payload"
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorSeverity;
    use crate::models::CategoryFilter;
    use chrono::{DateTime, TimeZone, Utc};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, d, 0, 0, 0).unwrap()
    }

    fn query(filter: CategoryFilter) -> AlertsQuery {
        AlertsQuery {
            filter,
            start: day(1),
            end: day(3),
        }
    }

    fn sample_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
            "wards": ["1", "2"],
            "complaint_types": ["Garbage"],
            "series": {{
                "all": {{
                    "data": [
                        {{"Time": "2026-02-01T00:00:00Z", "Data": 5}},
                        {{"Time": "2026-02-02T00:00:00Z", "Data": 9}},
                        {{"Time": "2026-02-10T00:00:00Z", "Data": 1}}
                    ],
                    "anomalies": ["2026-02-02T00:00:00Z", "2026-02-10T00:00:00Z"]
                }},
                "ward:1": {{ "data": [{{"Time": "2026-02-01T00:00:00Z", "Data": 2}}] }}
            }}
        }}"#
        )
        .unwrap();
        file
    }

    #[tokio::test]
    async fn test_fetch_clips_to_query_window() {
        let file = sample_file();
        let source = JsonFileSource::new(file.path());

        let payload = source.fetch(&query(CategoryFilter::All)).await.unwrap();

        assert_eq!(payload.data.len(), 2);
        assert_eq!(payload.anomalies, vec![day(2)]);
        assert_eq!(payload.complaints_count(), 14);
    }

    #[tokio::test]
    async fn test_fetch_by_ward_key() {
        let file = sample_file();
        let source = JsonFileSource::new(file.path());

        let payload = source
            .fetch(&query(CategoryFilter::Ward("1".to_string())))
            .await
            .unwrap();

        assert_eq!(payload.data.len(), 1);
        assert!(payload.anomalies.is_empty());
    }

    #[tokio::test]
    async fn test_missing_series() {
        let file = sample_file();
        let source = JsonFileSource::new(file.path());

        let result = source
            .fetch(&query(CategoryFilter::Complaint("Noise".to_string())))
            .await;

        assert!(matches!(result, Err(CoreError::SeriesNotFound { key, .. }) if key == "complaint:Noise"));
    }

    #[tokio::test]
    async fn test_catalog() {
        let file = sample_file();
        let catalog = JsonFileSource::new(file.path()).catalog().await.unwrap();

        assert_eq!(catalog.wards, vec!["1", "2"]);
        assert_eq!(catalog.complaint_types, vec!["Garbage"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_retried() {
        let source = JsonFileSource::new("/nonexistent/alerts.json");
        let result = source.read_document().await;

        assert!(matches!(result, Err(CoreError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let source =
            JsonFileSource::new(file.path()).with_retries(1, Duration::from_millis(10));
        let result = source.read_document().await;

        assert!(matches!(result, Err(CoreError::JsonParse { .. })));
    }

    #[tokio::test]
    async fn test_load_graceful_records_errors() {
        let file = sample_file();
        let source = JsonFileSource::new(file.path());
        let mut report = LoadReport::new();

        let (catalog, payload) = source
            .load_graceful(&query(CategoryFilter::Ward("2".to_string())), &mut report)
            .await
            .unwrap();

        assert!(report.catalog_loaded);
        assert_eq!(catalog.wards.len(), 2);
        assert!(payload.data.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].severity, ErrorSeverity::Warning);

        let mut missing = LoadReport::new();
        let none = JsonFileSource::new("/nonexistent/alerts.json")
            .load_graceful(&query(CategoryFilter::All), &mut missing)
            .await;
        assert!(none.is_none());
        assert_eq!(missing.errors[0].severity, ErrorSeverity::Warning);
    }
}

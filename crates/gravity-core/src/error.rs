//! Error types for gravity-core
//!
//! `CoreError` covers I/O and parsing of the alerts data file. Loading keeps
//! going on partial failure and records what went wrong in a `LoadReport`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gravity operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse JSON in {path}: {message}")]
    JsonParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },

    // ===================
    // Data source Errors
    // ===================
    #[error("No series for {key} in {path}")]
    SeriesNotFound { key: String, path: PathBuf },

    // ===================
    // Watch Errors
    // ===================
    #[error("File watcher error: {message}")]
    WatchError {
        message: String,
        #[source]
        source: Option<notify::Error>,
    },
}

/// Severity level for errors during load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Non-critical, can continue with degraded functionality
    Warning,
    /// Significant, the affected data is unavailable
    Error,
}

impl ErrorSeverity {
    pub fn label(self) -> &'static str {
        match self {
            ErrorSeverity::Warning => "warning",
            ErrorSeverity::Error => "error",
        }
    }
}

/// Individual error entry in load report
#[derive(Debug, Clone)]
pub struct LoadError {
    pub source: String,
    pub message: String,
    pub severity: ErrorSeverity,
    /// Actionable suggestion for user (optional)
    pub suggestion: Option<String>,
}

impl LoadError {
    /// Create user-friendly error from CoreError with context-aware suggestions
    pub fn from_core_error(source: impl Into<String>, error: &CoreError) -> Self {
        let source = source.into();
        let (message, suggestion, severity) = match error {
            CoreError::FileNotFound { path } => (
                format!("Data file not found: {}", path.display()),
                Some("Pass --data <file> or set GRAVITY_DATA".to_string()),
                ErrorSeverity::Warning,
            ),
            CoreError::FileRead { path, .. } => (
                format!("Cannot read file: {}", path.display()),
                Some(format!("Check permissions: chmod +r {}", path.display())),
                ErrorSeverity::Error,
            ),
            CoreError::JsonParse { path, message, .. } => (
                format!("Invalid JSON in {}: {}", path.display(), message),
                Some("Validate JSON syntax with: jq . <file>".to_string()),
                ErrorSeverity::Error,
            ),
            CoreError::SeriesNotFound { key, .. } => (
                error.to_string(),
                Some(format!("Add a \"{}\" entry under \"series\"", key)),
                ErrorSeverity::Warning,
            ),
            _ => (error.to_string(), None, ErrorSeverity::Error),
        };

        Self {
            source,
            message,
            severity,
            suggestion,
        }
    }
}

/// Report of errors encountered during data loading
#[derive(Debug, Default)]
pub struct LoadReport {
    pub errors: Vec<LoadError>,
    pub catalog_loaded: bool,
    pub points_loaded: usize,
    pub anomalies_loaded: usize,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: LoadError) {
        self.errors.push(error);
    }
}

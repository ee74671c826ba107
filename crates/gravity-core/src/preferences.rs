//! User preferences persistence for gravity
//!
//! Stores UI preferences in `<config_dir>/gravity/preferences.json`.

use crate::error::CoreError;
use crate::models::{CategoryType, DateRange};
use crate::store::AlertsStoreConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Terminal color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Dark,
    Light,
}

impl ColorScheme {
    pub fn toggle(self) -> Self {
        match self {
            ColorScheme::Dark => ColorScheme::Light,
            ColorScheme::Light => ColorScheme::Dark,
        }
    }
}

/// gravity user preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Color scheme (dark / light)
    pub color_scheme: ColorScheme,
    /// Range selected on startup
    pub default_date_range: DateRange,
    /// Category selected on startup
    pub default_category: CategoryType,
}

impl Preferences {
    const FILE_NAME: &'static str = "preferences.json";

    /// `<config_dir>/gravity`, if the platform has a config dir
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gravity"))
    }

    /// Load preferences from `<dir>/preferences.json`.
    /// Returns defaults on any I/O or parse error.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(Self::FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Persist preferences to `<dir>/preferences.json`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).map_err(|source| CoreError::FileWrite {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(Self::FILE_NAME);
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;
        std::fs::write(&path, content).map_err(|source| CoreError::FileWrite { path, source })?;
        Ok(())
    }

    /// Store configuration seeded from these preferences
    pub fn store_config(&self) -> AlertsStoreConfig {
        AlertsStoreConfig {
            default_range: self.default_date_range,
            default_category: self.default_category,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences {
            color_scheme: ColorScheme::Light,
            default_date_range: DateRange::LastMonth,
            default_category: CategoryType::Ward,
        };

        prefs.save(dir.path()).unwrap();
        assert_eq!(Preferences::load(dir.path()), prefs);
    }

    #[test]
    fn test_save_into_unwritable_dir_is_file_write_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let err = Preferences::default().save(&blocker).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::FileWrite { path, .. }) if path == &blocker
        ));
    }

    #[test]
    fn test_load_defaults_on_missing_or_invalid() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Preferences::load(dir.path()), Preferences::default());

        std::fs::write(dir.path().join("preferences.json"), "{ nope").unwrap();
        assert_eq!(Preferences::load(dir.path()), Preferences::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("preferences.json"),
            r#"{"default_date_range": "last_year"}"#,
        )
        .unwrap();

        let prefs = Preferences::load(dir.path());
        assert_eq!(prefs.default_date_range, DateRange::LastYear);
        assert_eq!(prefs.color_scheme, ColorScheme::Dark);

        let config = prefs.store_config();
        assert_eq!(config.default_range, DateRange::LastYear);
    }
}

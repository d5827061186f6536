//! Configuration structures for cohort-view.
//!
//! This module provides configuration types for the view models:
//!
//! - [`SearchConfig`] - Search paging and the department visibility rule
//! - [`CuratedConfig`] - Curated cohort titles, paging, and navigation
//! - [`ExportConfig`] - CSV export naming
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] with the values the
//! advising application ships with.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the free-text student search.
///
/// # Examples
///
/// ```
/// use cv_core::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.page_size, 50);
/// assert_eq!(config.privileged_department, "UWASC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results requested per page.
    pub page_size: usize,

    /// Limits at or above this bound are not sent with a request.
    ///
    /// The server ignores large limits and returns every match instead.
    pub max_limit: usize,

    /// Department whose members are shown inactive athletic affiliations.
    pub privileged_department: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_limit: 100,
            privileged_department: "UWASC".to_owned(),
        }
    }
}

/// Configuration for the curated cohort view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratedConfig {
    /// Page title used when a cohort has an empty name.
    pub default_title: String,

    /// Path prefix of the student detail page; the uid is appended.
    pub student_path: String,

    /// Number of students shown per page in the list tab.
    pub page_size: usize,
}

impl Default for CuratedConfig {
    fn default() -> Self {
        Self {
            default_title: "Curated Cohort".to_owned(),
            student_path: "/student/".to_owned(),
            page_size: 50,
        }
    }
}

/// Configuration for CSV exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// `strftime` pattern for the timestamp embedded in file names.
    pub timestamp_format: String,
}

impl ExportConfig {
    /// Timestamp pattern used when none is configured.
    pub const DEFAULT_TIMESTAMP_FORMAT: &'static str = "%Y-%m-%d_%H-%M-%S";
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            timestamp_format: Self::DEFAULT_TIMESTAMP_FORMAT.to_owned(),
        }
    }
}

/// Root configuration for cohort-view.
///
/// # Examples
///
/// ```
/// use cv_core::Config;
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
///
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("privileged_department"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search configuration.
    pub search: SearchConfig,

    /// Curated cohort configuration.
    pub curated: CuratedConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

impl Config {
    /// Loads and validates a configuration file.
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, malformed, or
    /// fails [`Config::validate`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_owned()));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that serde alone cannot reject.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] naming the first bad option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.page_size == 0 {
            return Err(ConfigError::invalid_option(
                "search.page_size",
                "must be positive",
            ));
        }
        if self.search.max_limit == 0 {
            return Err(ConfigError::invalid_option(
                "search.max_limit",
                "must be positive",
            ));
        }
        if self.curated.page_size == 0 {
            return Err(ConfigError::invalid_option(
                "curated.page_size",
                "must be positive",
            ));
        }
        if !self.curated.student_path.starts_with('/') {
            return Err(ConfigError::invalid_option(
                "curated.student_path",
                "must be an absolute path",
            ));
        }
        if self.export.timestamp_format.trim().is_empty() {
            return Err(ConfigError::invalid_option(
                "export.timestamp_format",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

//! CSV export naming.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use cv_core::ExportConfig;

/// A rendered group export ready to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Client-side file name.
    pub file_name: String,
    /// CSV body as returned by the backend.
    pub contents: String,
}

impl CsvExport {
    /// Pairs `contents` with the file name for `group_name` exported at `now`.
    #[must_use]
    pub fn new(group_name: &str, contents: String, now: NaiveDateTime, config: &ExportConfig) -> Self {
        Self {
            file_name: file_name(group_name, now, &config.timestamp_format),
            contents,
        }
    }
}

/// Returns `<group_name>-students-<timestamp>.csv`.
///
/// A timestamp format chrono cannot render falls back to the default one.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cv_api::export::file_name;
///
/// let now = NaiveDate::from_ymd_opt(2018, 9, 4)
///     .and_then(|d| d.and_hms_opt(13, 5, 9))
///     .unwrap();
/// assert_eq!(
///     file_name("Rowers", now, "%Y-%m-%d_%H-%M-%S"),
///     "Rowers-students-2018-09-04_13-05-09.csv",
/// );
/// ```
#[must_use]
pub fn file_name(group_name: &str, now: NaiveDateTime, timestamp_format: &str) -> String {
    let mut stamp = String::new();
    if write!(stamp, "{}", now.format(timestamp_format)).is_err() {
        tracing::warn!(format = timestamp_format, "unrenderable export timestamp format");
        stamp = now.format(ExportConfig::DEFAULT_TIMESTAMP_FORMAT).to_string();
    }
    format!("{group_name}-students-{stamp}.csv")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 31)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_default_format() {
        let export = CsvExport::new("Team A", "sid\n".to_owned(), noon(), &ExportConfig::default());
        insta::assert_snapshot!(export.file_name, @"Team A-students-2024-01-31_12-00-00.csv");
    }

    #[test]
    fn test_custom_format() {
        assert_eq!(file_name("x", noon(), "%Y%m%d"), "x-students-20240131.csv");
    }

    #[test]
    fn test_invalid_format_falls_back() {
        assert_eq!(
            file_name("x", noon(), "%Q"),
            "x-students-2024-01-31_12-00-00.csv"
        );
    }
}

//! Academic level of a student.

use serde::{Deserialize, Serialize};

/// A student's academic level.
///
/// Levels rank by ordinal, not by name: `Unknown` (rank 0) sorts before
/// `Freshman` (1), `Sophomore` (2), `Junior` (3), and `Senior` (4). The
/// derived ordering follows the same ranks.
///
/// Any description other than the four undergraduate levels, including a
/// missing or `null` value, reads as `Unknown`.
///
/// # Examples
///
/// ```
/// use cv_core::AcademicLevel;
///
/// let level: AcademicLevel = serde_json::from_str(r#""Junior""#).unwrap();
/// assert_eq!(level.rank(), 3);
///
/// let level: AcademicLevel = serde_json::from_str(r#""Graduate""#).unwrap();
/// assert_eq!(level, AcademicLevel::Unknown);
/// assert!(AcademicLevel::Unknown < AcademicLevel::Freshman);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum AcademicLevel {
    /// Missing or unrecognised level.
    #[default]
    Unknown,
    /// First-year undergraduate.
    Freshman,
    /// Second-year undergraduate.
    Sophomore,
    /// Third-year undergraduate.
    Junior,
    /// Fourth-year undergraduate.
    Senior,
}

impl AcademicLevel {
    /// Parses the server's level description.
    #[must_use]
    pub fn from_description(description: &str) -> Self {
        match description {
            "Freshman" => Self::Freshman,
            "Sophomore" => Self::Sophomore,
            "Junior" => Self::Junior,
            "Senior" => Self::Senior,
            _ => Self::Unknown,
        }
    }

    /// Returns the ordinal rank used for sorting.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Freshman => 1,
            Self::Sophomore => 2,
            Self::Junior => 3,
            Self::Senior => 4,
        }
    }

    /// Returns the server's description, or `None` for `Unknown`.
    #[must_use]
    pub const fn description(self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            Self::Freshman => Some("Freshman"),
            Self::Sophomore => Some("Sophomore"),
            Self::Junior => Some("Junior"),
            Self::Senior => Some("Senior"),
        }
    }
}

impl From<Option<String>> for AcademicLevel {
    fn from(description: Option<String>) -> Self {
        description
            .as_deref()
            .map_or(Self::Unknown, Self::from_description)
    }
}

impl From<AcademicLevel> for Option<String> {
    fn from(level: AcademicLevel) -> Self {
        level.description().map(str::to_owned)
    }
}

impl std::fmt::Display for AcademicLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description().unwrap_or("Unknown"))
    }
}

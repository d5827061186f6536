//! Student summary records.
//!
//! A [`Student`] carries the attributes the collection views order and
//! display by. Everything except the sid is optional on the wire, so every
//! other field has a serde default.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::level::AcademicLevel;

/// One athletic team group a student belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMembership {
    /// Team group code, e.g. `MFB-DL`.
    pub group_code: String,
    /// Team group display name, e.g. `Football, Defensive Line`.
    pub group_name: String,
    /// Team code, e.g. `FBM`.
    #[serde(default)]
    pub team_code: String,
    /// Team display name.
    #[serde(default)]
    pub team_name: String,
}

/// Athletic study center data attached to athlete students.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AthleticsProfile {
    /// Team memberships in server order.
    pub athletics: SmallVec<[TeamMembership; 2]>,
    /// `Some(false)` marks an inactive affiliation.
    pub is_active_asc: Option<bool>,
    /// Whether the student is in the intensive cohort.
    pub in_intensive_cohort: Option<bool>,
}

/// A student summary as returned inside groups and search results.
///
/// # Examples
///
/// ```
/// use cv_core::{AcademicLevel, Student};
///
/// let student: Student = serde_json::from_str(r#"{
///     "sid": "11667051",
///     "firstName": "Deborah",
///     "lastName": "Davies",
///     "cumulativeGPA": 3.8,
///     "level": "Junior",
///     "majors": ["English BA", "Nuclear Engineering BS"]
/// }"#).unwrap();
///
/// assert_eq!(student.level, AcademicLevel::Junior);
/// assert_eq!(student.first_major(), Some("English BA"));
/// assert!(!student.is_plottable());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Student identifier.
    pub sid: String,

    /// Campus user id, used for student detail pages.
    #[serde(default)]
    pub uid: Option<String>,

    /// Given name.
    #[serde(default)]
    pub first_name: String,

    /// Family name.
    #[serde(default)]
    pub last_name: String,

    /// Cumulative grade point average.
    #[serde(default, rename = "cumulativeGPA")]
    pub cumulative_gpa: Option<f64>,

    /// Cumulative units completed.
    #[serde(default)]
    pub cumulative_units: Option<f64>,

    /// Academic level.
    #[serde(default)]
    pub level: AcademicLevel,

    /// Declared majors, in server order.
    #[serde(default)]
    pub majors: SmallVec<[String; 2]>,

    /// Athletics data, present for athletes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athletics_profile: Option<AthleticsProfile>,

    /// Whether the student is enrolled in the current term.
    #[serde(default)]
    pub has_current_term_enrollments: bool,
}

impl Student {
    /// Creates a student with only names set.
    #[must_use]
    pub fn new(sid: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// Returns the first declared major, if any.
    #[must_use]
    pub fn first_major(&self) -> Option<&str> {
        self.majors.first().map(String::as_str)
    }

    /// Returns the name of the first team group, if the student is an athlete.
    #[must_use]
    pub fn team_group_name(&self) -> Option<&str> {
        self.athletics_profile
            .as_ref()
            .and_then(|profile| profile.athletics.first())
            .map(|membership| membership.group_name.as_str())
    }

    /// Returns `true` if the athletics profile marks the affiliation inactive.
    #[must_use]
    pub fn is_inactive_asc(&self) -> bool {
        self.athletics_profile
            .as_ref()
            .is_some_and(|profile| profile.is_active_asc == Some(false))
    }

    /// Returns `true` if both plotted measures (GPA and units) are present.
    #[must_use]
    pub const fn is_plottable(&self) -> bool {
        self.cumulative_gpa.is_some() && self.cumulative_units.is_some()
    }

    /// Returns "Last, First".
    #[must_use]
    pub fn sortable_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

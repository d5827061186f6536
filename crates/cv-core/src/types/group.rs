//! Curated group records.
//!
//! A curated group (also called a curated cohort) is a named, user-owned
//! list of students assembled by hand.

use serde::{Deserialize, Serialize};

use super::student::Student;

/// Identifier of a curated group.
///
/// # Examples
///
/// ```
/// use cv_core::GroupId;
///
/// let id: GroupId = serde_json::from_str("7").unwrap();
/// assert_eq!(id, GroupId::new(7));
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl GroupId {
    /// Creates a new group id.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the inner value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for GroupId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for GroupId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A curated group with its ordered students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedGroup {
    /// Group identifier.
    pub id: GroupId,

    /// Display name. May be empty.
    #[serde(default)]
    pub name: String,

    /// Owner's user id.
    #[serde(default)]
    pub owner_id: Option<u32>,

    /// Whether students lacking plot measures are listed separately in the
    /// matrix view.
    #[serde(default = "default_true")]
    pub separate_unplottable: bool,

    /// Number of students in the group on the server.
    #[serde(default)]
    pub student_count: usize,

    /// Students in server order.
    #[serde(default)]
    pub students: Vec<Student>,
}

const fn default_true() -> bool {
    true
}

impl CuratedGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            owner_id: None,
            separate_unplottable: true,
            student_count: 0,
            students: Vec::new(),
        }
    }

    /// Returns the group name, or `fallback` if the name is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cv_core::{CuratedGroup, GroupId};
    ///
    /// let group = CuratedGroup::new(GroupId::new(1), "");
    /// assert_eq!(group.title_or("Curated Cohort"), "Curated Cohort");
    /// ```
    #[must_use]
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.name.is_empty() {
            fallback
        } else {
            &self.name
        }
    }

    /// Removes every student with the given sid, keeping the relative order
    /// of the rest. Returns `true` if anything was removed.
    pub fn remove_student(&mut self, sid: &str) -> bool {
        let before = self.students.len();
        self.students.retain(|student| student.sid != sid);
        let removed = before - self.students.len();
        self.student_count = self.student_count.saturating_sub(removed);
        removed > 0
    }

    /// Returns `true` if a student with the given sid is in the group.
    #[must_use]
    pub fn contains(&self, sid: &str) -> bool {
        self.students.iter().any(|student| student.sid == sid)
    }

    /// Returns the summary form of this group.
    #[must_use]
    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            id: self.id,
            name: self.name.clone(),
            student_count: self.student_count,
        }
    }
}

/// A group without its students, as listed in menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    /// Group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Number of students.
    #[serde(default)]
    pub student_count: usize,
}

/// An advisor who owns curated groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOwner {
    /// Authorized user id, referenced by [`CuratedGroup::owner_id`].
    #[serde(default)]
    pub id: u32,
    /// Campus user id.
    pub uid: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// One owner and their groups, as returned by the all-groups listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerGroups {
    /// The owner.
    pub user: GroupOwner,
    /// Groups owned by the user.
    pub groups: Vec<GroupSummary>,
}

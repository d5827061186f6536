//! Paged student search results.

use serde::{Deserialize, Serialize};

use super::student::Student;

/// One page of search results plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Students on this page, in server order.
    #[serde(default)]
    pub students: Vec<Student>,

    /// Number of students matching the query across all pages.
    #[serde(default)]
    pub total_student_count: usize,
}

impl SearchResults {
    /// Returns `true` if nothing matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_student_count == 0
    }
}

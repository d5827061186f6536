//! Which failures a caller sees.
//!
//! Every group operation has exactly one policy. Read paths that only feed
//! menus and downloads fail quietly; the operations a user explicitly
//! triggers report their errors.

use std::fmt;

/// A curated-group or search operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupOperation {
    /// Create a group.
    Create,
    /// Add students to a group.
    AddStudents,
    /// Remove one student from a group.
    RemoveStudent,
    /// Delete a group.
    Delete,
    /// Rename a group.
    Rename,
    /// Fetch one group with its students.
    FetchOne,
    /// List the current user's groups.
    FetchMine,
    /// List every owner with their groups.
    FetchAllWithOwners,
    /// List the current user's groups containing a student.
    FetchGroupIdsForStudent,
    /// List a group's students with alerts.
    StudentsWithAlerts,
    /// Download a group as CSV.
    ExportCsv,
    /// Search students.
    Search,
}

impl GroupOperation {
    /// Every operation.
    pub const ALL: [Self; 12] = [
        Self::Create,
        Self::AddStudents,
        Self::RemoveStudent,
        Self::Delete,
        Self::Rename,
        Self::FetchOne,
        Self::FetchMine,
        Self::FetchAllWithOwners,
        Self::FetchGroupIdsForStudent,
        Self::StudentsWithAlerts,
        Self::ExportCsv,
        Self::Search,
    ];

    /// Short name used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::AddStudents => "add_students",
            Self::RemoveStudent => "remove_student",
            Self::Delete => "delete",
            Self::Rename => "rename",
            Self::FetchOne => "fetch_one",
            Self::FetchMine => "fetch_mine",
            Self::FetchAllWithOwners => "fetch_all_with_owners",
            Self::FetchGroupIdsForStudent => "fetch_group_ids_for_student",
            Self::StudentsWithAlerts => "students_with_alerts",
            Self::ExportCsv => "export_csv",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for GroupOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a failed operation reaches its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// The error is returned and the calling view shows it.
    Surface,
    /// The failure is logged and the call resolves to `Ok(None)`.
    Swallow,
    /// The error is returned; the caller decides whether to show it.
    ReturnToCaller,
}

impl FailurePolicy {
    /// Returns the policy for `operation`.
    ///
    /// | Policy | Operations |
    /// |---|---|
    /// | `Surface` | create, add students, remove student, fetch one, search |
    /// | `Swallow` | export CSV, fetch mine, fetch all with owners, group ids for a student, students with alerts |
    /// | `ReturnToCaller` | delete, rename |
    #[must_use]
    pub const fn for_operation(operation: GroupOperation) -> Self {
        match operation {
            GroupOperation::Create
            | GroupOperation::AddStudents
            | GroupOperation::RemoveStudent
            | GroupOperation::FetchOne
            | GroupOperation::Search => Self::Surface,
            GroupOperation::FetchMine
            | GroupOperation::FetchAllWithOwners
            | GroupOperation::FetchGroupIdsForStudent
            | GroupOperation::StudentsWithAlerts
            | GroupOperation::ExportCsv => Self::Swallow,
            GroupOperation::Delete | GroupOperation::Rename => Self::ReturnToCaller,
        }
    }

    /// Returns `true` if failures resolve to `Ok(None)`.
    #[must_use]
    pub const fn is_silent(self) -> bool {
        matches!(self, Self::Swallow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        let silent: Vec<GroupOperation> = GroupOperation::ALL
            .into_iter()
            .filter(|op| FailurePolicy::for_operation(*op).is_silent())
            .collect();
        assert_eq!(
            silent,
            [
                GroupOperation::FetchMine,
                GroupOperation::FetchAllWithOwners,
                GroupOperation::FetchGroupIdsForStudent,
                GroupOperation::StudentsWithAlerts,
                GroupOperation::ExportCsv,
            ]
        );
        assert_eq!(
            FailurePolicy::for_operation(GroupOperation::Delete),
            FailurePolicy::ReturnToCaller
        );
        assert_eq!(
            FailurePolicy::for_operation(GroupOperation::Rename),
            FailurePolicy::ReturnToCaller
        );
        assert_eq!(
            FailurePolicy::for_operation(GroupOperation::RemoveStudent),
            FailurePolicy::Surface
        );
    }
}

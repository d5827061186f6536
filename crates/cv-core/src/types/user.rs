//! The signed-in user and the department-scoped visibility rule.

use serde::{Deserialize, Serialize};

/// Membership of a user in an advising department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentMembership {
    /// Department code, e.g. `UWASC` or `COENG`.
    pub code: String,
    /// Whether the user advises in this department.
    #[serde(default)]
    pub is_advisor: bool,
    /// Whether the user directs this department.
    #[serde(default)]
    pub is_director: bool,
}

/// The signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Campus user id.
    pub uid: String,
    /// Whether the user is an administrator.
    #[serde(default)]
    pub is_admin: bool,
    /// Department memberships.
    #[serde(default)]
    pub departments: Vec<DepartmentMembership>,
}

impl CurrentUser {
    /// Returns `true` if the user belongs to the department with `code`.
    ///
    /// Administrators are not implicitly members of every department.
    #[must_use]
    pub fn is_department_member(&self, code: &str) -> bool {
        self.departments.iter().any(|dept| dept.code == code)
    }
}

/// Value of the `isInactiveAsc` search parameter.
///
/// The server applies a filter on the athletic-affiliation inactive flag
/// only when the parameter is present. What it does when the parameter is
/// absent is the server's business; [`InactiveAsc::ServerDefault`] sends
/// nothing and makes no assumption about the result.
///
/// # Examples
///
/// ```
/// use cv_core::{CurrentUser, DepartmentMembership, InactiveAsc};
///
/// let mut user = CurrentUser::default();
/// assert_eq!(InactiveAsc::for_user(&user, "UWASC"), InactiveAsc::ServerDefault);
///
/// user.departments.push(DepartmentMembership {
///     code: "UWASC".to_owned(),
///     is_advisor: true,
///     is_director: false,
/// });
/// assert_eq!(InactiveAsc::for_user(&user, "UWASC").as_param(), Some(false));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum InactiveAsc {
    /// `isInactiveAsc=false`: exclude students flagged inactive.
    NotInactive,
    /// Parameter omitted: the server decides.
    #[default]
    ServerDefault,
    /// `isInactiveAsc=true`: only students flagged inactive.
    Inactive,
}

impl InactiveAsc {
    /// Applies the department visibility rule.
    ///
    /// Members of `department` send an explicit `false`; everyone else
    /// omits the parameter.
    #[must_use]
    pub fn for_user(user: &CurrentUser, department: &str) -> Self {
        if user.is_department_member(department) {
            Self::NotInactive
        } else {
            Self::ServerDefault
        }
    }

    /// Returns the wire value of the parameter.
    #[must_use]
    pub const fn as_param(self) -> Option<bool> {
        match self {
            Self::NotInactive => Some(false),
            Self::ServerDefault => None,
            Self::Inactive => Some(true),
        }
    }

    /// Returns `true` if a student with the given inactive flag passes.
    #[must_use]
    pub const fn admits(self, is_inactive: bool) -> bool {
        match self {
            Self::NotInactive => !is_inactive,
            Self::ServerDefault => true,
            Self::Inactive => is_inactive,
        }
    }
}

impl From<Option<bool>> for InactiveAsc {
    fn from(param: Option<bool>) -> Self {
        match param {
            Some(false) => Self::NotInactive,
            None => Self::ServerDefault,
            Some(true) => Self::Inactive,
        }
    }
}

impl From<InactiveAsc> for Option<bool> {
    fn from(filter: InactiveAsc) -> Self {
        filter.as_param()
    }
}

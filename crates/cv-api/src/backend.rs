//! Backend contracts for curated group storage and student search.
//!
//! Both traits return `Send` futures so a driver can run calls on a
//! multi-threaded runtime and race them against cancellation.

use std::future::Future;

use cv_core::{
    CuratedGroup, GroupId, GroupSummary, InactiveAsc, OwnerGroups, Pagination, SearchResults,
    SortKey, Student,
};
use serde::Serialize;

use crate::error::ApiResult;

/// Storage for curated groups.
///
/// Every mutation answers with the updated group so callers can publish it
/// without a second round trip.
pub trait GroupBackend: Send + Sync {
    /// Creates a group owned by the current user.
    fn create_group(
        &self,
        name: &str,
        sids: &[String],
    ) -> impl Future<Output = ApiResult<CuratedGroup>> + Send;

    /// Adds students to a group.
    ///
    /// With `return_student_profiles` unset the response carries the group
    /// without its student list.
    fn add_students(
        &self,
        id: GroupId,
        sids: &[String],
        return_student_profiles: bool,
    ) -> impl Future<Output = ApiResult<CuratedGroup>> + Send;

    /// Removes one student from a group.
    fn remove_student(
        &self,
        id: GroupId,
        sid: &str,
    ) -> impl Future<Output = ApiResult<CuratedGroup>> + Send;

    /// Deletes a group.
    fn delete_group(&self, id: GroupId) -> impl Future<Output = ApiResult<()>> + Send;

    /// Renames a group.
    fn rename_group(
        &self,
        id: GroupId,
        name: &str,
    ) -> impl Future<Output = ApiResult<CuratedGroup>> + Send;

    /// Fetches one page of a group's students in server order.
    fn get_group(
        &self,
        id: GroupId,
        order_by: SortKey,
        page: Pagination,
    ) -> impl Future<Output = ApiResult<CuratedGroup>> + Send;

    /// Lists the current user's groups.
    fn my_groups(&self) -> impl Future<Output = ApiResult<Vec<GroupSummary>>> + Send;

    /// Lists which of the current user's groups contain `sid`.
    fn my_group_ids_for_student(
        &self,
        sid: &str,
    ) -> impl Future<Output = ApiResult<Vec<GroupId>>> + Send;

    /// Lists every user that owns groups, with their groups.
    fn users_with_groups(&self) -> impl Future<Output = ApiResult<Vec<OwnerGroups>>> + Send;

    /// Renders a group as CSV.
    fn download_csv(&self, id: GroupId) -> impl Future<Output = ApiResult<String>> + Send;

    /// Lists the group's students that have unread alerts.
    fn students_with_alerts(
        &self,
        id: GroupId,
    ) -> impl Future<Output = ApiResult<Vec<Student>>> + Send;
}

/// Student search.
pub trait SearchBackend: Send + Sync {
    /// Runs one search request.
    fn search(&self, query: &SearchQuery) -> impl Future<Output = ApiResult<SearchResults>> + Send;
}

/// Body of a student search request.
///
/// # Examples
///
/// ```
/// use cv_api::SearchQuery;
/// use cv_core::{InactiveAsc, Pagination, SortKey};
///
/// let query = SearchQuery::new("ann", InactiveAsc::ServerDefault, SortKey::Gpa, Pagination::first(50), 100);
/// assert_eq!(query.limit, Some(50));
///
/// // Oversized limits are dropped and the server picks its own.
/// let query = SearchQuery::new("ann", InactiveAsc::ServerDefault, SortKey::Gpa, Pagination::first(500), 100);
/// assert_eq!(query.limit, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Free-text phrase.
    pub search_phrase: String,
    /// Athletic-affiliation inactive filter. Omitted when the server decides.
    #[serde(rename = "isInactiveAsc", skip_serializing_if = "is_server_default")]
    pub inactive_asc: InactiveAsc,
    /// Requested ordering.
    pub order_by: SortKey,
    /// Index of the first result.
    pub offset: usize,
    /// Page size. Omitted when it would exceed the server cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SearchQuery {
    /// Builds a request for `page`, sending its limit only when it is below
    /// `max_limit`.
    #[must_use]
    pub fn new(
        search_phrase: impl Into<String>,
        inactive_asc: InactiveAsc,
        order_by: SortKey,
        page: Pagination,
        max_limit: usize,
    ) -> Self {
        Self {
            search_phrase: search_phrase.into(),
            inactive_asc,
            order_by,
            offset: page.offset,
            limit: (page.limit < max_limit).then_some(page.limit),
        }
    }
}

fn is_server_default(filter: &InactiveAsc) -> bool {
    *filter == InactiveAsc::ServerDefault
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_clamp_boundary() {
        let at_cap = SearchQuery::new("x", InactiveAsc::default(), SortKey::FirstName, Pagination::first(100), 100);
        assert_eq!(at_cap.limit, None);
        let below = SearchQuery::new("x", InactiveAsc::default(), SortKey::FirstName, Pagination::first(99), 100);
        assert_eq!(below.limit, Some(99));
    }

    #[test]
    fn test_wire_shape_for_member() {
        let query = SearchQuery::new(
            "oski",
            InactiveAsc::NotInactive,
            SortKey::Level,
            Pagination::for_page(1, 50),
            100,
        );
        insta::assert_json_snapshot!(query, @r#"
        {
          "searchPhrase": "oski",
          "isInactiveAsc": false,
          "orderBy": "level",
          "offset": 50,
          "limit": 50
        }
        "#);
    }

    #[test]
    fn test_wire_shape_omits_server_default() {
        let query = SearchQuery::new(
            "oski",
            InactiveAsc::ServerDefault,
            SortKey::FirstName,
            Pagination::first(500),
            100,
        );
        insta::assert_json_snapshot!(query, @r#"
        {
          "searchPhrase": "oski",
          "orderBy": "first_name",
          "offset": 0
        }
        "#);
    }
}

//! Curated group operations with store plumbing.
//!
//! [`CuratedGroupApi`] wraps a [`GroupBackend`] and publishes every
//! successful mutation to an [`AppStore`]. Failures follow
//! [`FailurePolicy::for_operation`].

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use cv_core::{
    CuratedGroup, ExportConfig, GroupId, GroupSummary, OwnerGroups, Pagination, SearchResults,
    SortKey, Student,
};
use tracing::{debug, info, warn};

use crate::backend::{GroupBackend, SearchBackend, SearchQuery};
use crate::error::ApiResult;
use crate::export::CsvExport;
use crate::policy::{FailurePolicy, GroupOperation};
use crate::store::{AppStore, CuratedEvent, CuratedEventAction, Mutation, StoreAction};

/// Curated group API bound to a backend and a store.
#[derive(Debug)]
pub struct CuratedGroupApi<B, S> {
    backend: Arc<B>,
    store: Arc<S>,
    export: ExportConfig,
}

impl<B, S> Clone for CuratedGroupApi<B, S> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            store: Arc::clone(&self.store),
            export: self.export.clone(),
        }
    }
}

impl<B: GroupBackend, S: AppStore> CuratedGroupApi<B, S> {
    /// Creates an API over `backend` publishing to `store`.
    pub fn new(backend: Arc<B>, store: Arc<S>, export: ExportConfig) -> Self {
        Self {
            backend,
            store,
            export,
        }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Returns the store mutations are published to.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Creates a group and dispatches it to the store.
    pub async fn create(&self, name: &str, sids: &[String]) -> ApiResult<CuratedGroup> {
        let group = loudly(
            GroupOperation::Create,
            self.backend.create_group(name, sids).await,
        )?;
        info!(id = %group.id, students = group.student_count, "created curated group");
        self.store
            .dispatch(StoreAction::CreateCuratedGroup(group.clone()));
        Ok(group)
    }

    /// Adds students to a group and dispatches the update.
    pub async fn add_students(
        &self,
        id: GroupId,
        sids: &[String],
        return_student_profiles: bool,
    ) -> ApiResult<CuratedGroup> {
        let group = loudly(
            GroupOperation::AddStudents,
            self.backend
                .add_students(id, sids, return_student_profiles)
                .await,
        )?;
        self.store
            .dispatch(StoreAction::UpdateCuratedGroup(group.clone()));
        Ok(group)
    }

    /// Removes a student, dispatches the update, then records the event.
    pub async fn remove_student(&self, id: GroupId, sid: &str) -> ApiResult<CuratedGroup> {
        let group = loudly(
            GroupOperation::RemoveStudent,
            self.backend.remove_student(id, sid).await,
        )?;
        debug!(id = %group.id, sid, "removed student from curated group");
        self.store
            .dispatch(StoreAction::UpdateCuratedGroup(group.clone()));
        self.store.dispatch(StoreAction::CuratedEvent(CuratedEvent::new(
            group.id,
            Some(group.name.clone()),
            CuratedEventAction::RemoveStudent,
        )));
        Ok(group)
    }

    /// Deletes a group, commits the deletion, then records the event.
    ///
    /// Errors are returned to the caller and never shown automatically.
    pub async fn delete(&self, id: GroupId) -> ApiResult<()> {
        loudly(GroupOperation::Delete, self.backend.delete_group(id).await)?;
        self.store.commit(Mutation::DeleteCuratedGroup(id));
        self.store.dispatch(StoreAction::CuratedEvent(CuratedEvent::new(
            id,
            None,
            CuratedEventAction::Delete,
        )));
        Ok(())
    }

    /// Renames a group, commits the update, then records the event.
    ///
    /// Errors are returned to the caller and never shown automatically.
    pub async fn rename(&self, id: GroupId, name: &str) -> ApiResult<CuratedGroup> {
        let group = loudly(
            GroupOperation::Rename,
            self.backend.rename_group(id, name).await,
        )?;
        self.store.commit(Mutation::UpdateCuratedGroup(group.clone()));
        self.store.dispatch(StoreAction::CuratedEvent(CuratedEvent::new(
            group.id,
            Some(group.name.clone()),
            CuratedEventAction::Rename,
        )));
        Ok(group)
    }

    /// Fetches one page of a group.
    pub async fn get_group(
        &self,
        id: GroupId,
        order_by: SortKey,
        page: Pagination,
    ) -> ApiResult<CuratedGroup> {
        loudly(
            GroupOperation::FetchOne,
            self.backend.get_group(id, order_by, page).await,
        )
    }

    /// Lists the current user's groups; `None` if the request failed.
    pub async fn my_groups(&self) -> ApiResult<Option<Vec<GroupSummary>>> {
        quietly(GroupOperation::FetchMine, self.backend.my_groups().await)
    }

    /// Lists the current user's groups containing `sid`; `None` if the
    /// request failed.
    pub async fn my_group_ids_for_student(&self, sid: &str) -> ApiResult<Option<Vec<GroupId>>> {
        quietly(
            GroupOperation::FetchGroupIdsForStudent,
            self.backend.my_group_ids_for_student(sid).await,
        )
    }

    /// Lists every owner with their groups; `None` if the request failed.
    pub async fn users_with_groups(&self) -> ApiResult<Option<Vec<OwnerGroups>>> {
        quietly(
            GroupOperation::FetchAllWithOwners,
            self.backend.users_with_groups().await,
        )
    }

    /// Lists a group's students with alerts; `None` if the request failed.
    pub async fn students_with_alerts(&self, id: GroupId) -> ApiResult<Option<Vec<Student>>> {
        quietly(
            GroupOperation::StudentsWithAlerts,
            self.backend.students_with_alerts(id).await,
        )
    }

    /// Downloads a group as CSV named for the current local time.
    pub async fn download_csv(&self, id: GroupId, name: &str) -> ApiResult<Option<CsvExport>> {
        self.download_csv_at(id, name, Local::now().naive_local())
            .await
    }

    /// Downloads a group as CSV named for `now`; `None` if the request failed.
    pub async fn download_csv_at(
        &self,
        id: GroupId,
        name: &str,
        now: NaiveDateTime,
    ) -> ApiResult<Option<CsvExport>> {
        let contents = quietly(GroupOperation::ExportCsv, self.backend.download_csv(id).await)?;
        Ok(contents.map(|contents| CsvExport::new(name, contents, now, &self.export)))
    }
}

impl<B: GroupBackend + SearchBackend, S: AppStore> CuratedGroupApi<B, S> {
    /// Searches students. Failures are surfaced to the caller.
    pub async fn search(&self, query: &SearchQuery) -> ApiResult<SearchResults> {
        loudly(GroupOperation::Search, self.backend.search(query).await)
    }
}

fn loudly<T>(operation: GroupOperation, result: ApiResult<T>) -> ApiResult<T> {
    if let Err(error) = &result {
        debug!(
            %operation,
            policy = ?FailurePolicy::for_operation(operation),
            %error,
            "request failed"
        );
    }
    result
}

fn quietly<T>(operation: GroupOperation, result: ApiResult<T>) -> ApiResult<Option<T>> {
    debug_assert!(FailurePolicy::for_operation(operation).is_silent());
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            warn!(%operation, %error, "curated group request failed; ignoring");
            Ok(None)
        }
    }
}

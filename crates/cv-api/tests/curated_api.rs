//! Store plumbing and failure policy of the curated group API.

use std::sync::Arc;

use chrono::NaiveDate;
use cv_api::memory::Dataset;
use cv_api::{
    AppStore, CuratedEventAction, CuratedGroupApi, GroupOperation, MemoryBackend, Mutation,
    SearchQuery, StoreAction,
};
use cv_core::{
    CuratedGroup, ExportConfig, GroupId, GroupSummary, InactiveAsc, Pagination, SortKey,
};
use parking_lot::Mutex;

/// Store that records every entry point call in order.
#[derive(Debug, Default)]
struct RecordingStore {
    calls: Mutex<Vec<Call>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Commit(Mutation),
    Dispatch(StoreAction),
}

impl RecordingStore {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

impl AppStore for RecordingStore {
    fn commit(&self, mutation: Mutation) {
        self.calls.lock().push(Call::Commit(mutation));
    }

    fn dispatch(&self, action: StoreAction) {
        self.calls.lock().push(Call::Dispatch(action));
    }
}

const DATASET: &str = r#"{
    "users": [{ "id": 1, "uid": "2040", "name": "Oski Bear" }],
    "students": [
        { "sid": "11", "firstName": "Ann", "lastName": "Ito", "level": "Senior" },
        { "sid": "22", "firstName": "Bo", "lastName": "Anders", "level": "Freshman" }
    ],
    "groups": [{ "id": 4, "name": "Advisees", "ownerUid": "2040", "sids": ["11", "22"] }]
}"#;

fn api() -> (CuratedGroupApi<MemoryBackend, RecordingStore>, Arc<RecordingStore>) {
    let backend = Arc::new(MemoryBackend::new(
        Dataset::from_json(DATASET).unwrap(),
        "2040",
    ));
    let store = Arc::new(RecordingStore::default());
    let api = CuratedGroupApi::new(backend, Arc::clone(&store), ExportConfig::default());
    (api, store)
}

fn action_of(call: &Call) -> Option<CuratedEventAction> {
    match call {
        Call::Dispatch(StoreAction::CuratedEvent(event)) => Some(event.action),
        _ => None,
    }
}

#[tokio::test]
async fn create_dispatches_new_group() {
    let (api, store) = api();
    let group = api.create("Rowers", &["11".to_owned()]).await.unwrap();
    assert_eq!(
        store.calls(),
        [Call::Dispatch(StoreAction::CreateCuratedGroup(group))]
    );
}

#[tokio::test]
async fn remove_dispatches_update_then_event() {
    let (api, store) = api();
    let group = api.remove_student(GroupId::new(4), "22").await.unwrap();
    assert_eq!(group.student_count, 1);

    let calls = store.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(
        &calls[0],
        Call::Dispatch(StoreAction::UpdateCuratedGroup(updated)) if updated.student_count == 1
    ));
    match &calls[1] {
        Call::Dispatch(StoreAction::CuratedEvent(event)) => {
            assert_eq!(event.id, GroupId::new(4));
            assert_eq!(event.name.as_deref(), Some("Advisees"));
            assert_eq!(event.action, CuratedEventAction::RemoveStudent);
        }
        other => panic!("unexpected store call: {other:?}"),
    }
}

#[tokio::test]
async fn rename_commits_update_then_event() {
    let (api, store) = api();
    api.rename(GroupId::new(4), "Renamed").await.unwrap();
    let calls = store.calls();
    assert!(matches!(
        &calls[0],
        Call::Commit(Mutation::UpdateCuratedGroup(group)) if group.name == "Renamed"
    ));
    assert_eq!(action_of(&calls[1]), Some(CuratedEventAction::Rename));
}

#[tokio::test]
async fn delete_commits_then_records_event_without_name() {
    let (api, store) = api();
    api.delete(GroupId::new(4)).await.unwrap();
    let calls = store.calls();
    assert_eq!(calls[0], Call::Commit(Mutation::DeleteCuratedGroup(GroupId::new(4))));
    match &calls[1] {
        Call::Dispatch(StoreAction::CuratedEvent(event)) => assert!(event.name.is_none()),
        other => panic!("unexpected store call: {other:?}"),
    }
}

#[tokio::test]
async fn failed_delete_is_returned_and_store_untouched() {
    let (api, store) = api();
    api.backend()
        .fail_next(GroupOperation::Delete, 500, "database unavailable");
    let err = api.delete(GroupId::new(4)).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn failed_remove_is_surfaced_and_store_untouched() {
    let (api, store) = api();
    api.backend()
        .fail_next(GroupOperation::RemoveStudent, 502, "");
    assert!(api.remove_student(GroupId::new(4), "22").await.is_err());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn failed_search_is_surfaced_and_store_untouched() {
    let (api, store) = api();
    let query = SearchQuery::new(
        "an",
        InactiveAsc::ServerDefault,
        SortKey::LastName,
        Pagination::first(50),
        100,
    );
    api.backend()
        .fail_next(GroupOperation::Search, 503, "search unavailable");
    let err = api.search(&query).await.unwrap_err();
    assert_eq!(err.status(), Some(503));

    let results = api.search(&query).await.unwrap();
    assert_eq!(results.total_student_count, 2);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn silent_reads_resolve_to_none() {
    let (api, _store) = api();
    api.backend().fail_next(GroupOperation::FetchMine, 500, "");
    assert_eq!(api.my_groups().await.unwrap(), None);

    let mine: Option<Vec<GroupSummary>> = api.my_groups().await.unwrap();
    assert_eq!(mine.map(|groups| groups.len()), Some(1));

    api.backend().fail_next(GroupOperation::ExportCsv, 500, "");
    assert_eq!(api.download_csv(GroupId::new(4), "Advisees").await.unwrap(), None);

    api.backend()
        .fail_next(GroupOperation::StudentsWithAlerts, 500, "");
    assert_eq!(api.students_with_alerts(GroupId::new(4)).await.unwrap(), None);
}

#[tokio::test]
async fn missing_group_export_is_silent() {
    let (api, _store) = api();
    assert_eq!(api.download_csv(GroupId::new(77), "Nope").await.unwrap(), None);
}

#[tokio::test]
async fn export_is_named_for_group_and_time() {
    let (api, _store) = api();
    let now = NaiveDate::from_ymd_opt(2018, 9, 4)
        .and_then(|date| date.and_hms_opt(8, 30, 0))
        .unwrap();
    let export = api
        .download_csv_at(GroupId::new(4), "Advisees", now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(export.file_name, "Advisees-students-2018-09-04_08-30-00.csv");
    assert!(export.contents.starts_with("first_name,last_name,sid"));
}

#[tokio::test]
async fn get_group_reads_without_publishing() {
    let (api, store) = api();
    let group: CuratedGroup = api
        .get_group(GroupId::new(4), SortKey::Level, Pagination::first(50))
        .await
        .unwrap();
    let sids: Vec<&str> = group.students.iter().map(|s| s.sid.as_str()).collect();
    assert_eq!(sids, ["22", "11"]);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn add_students_dispatches_update() {
    let (api, store) = api();
    let group = api
        .create("Empty", &[])
        .await
        .unwrap();
    api.add_students(group.id, &["11".to_owned()], true)
        .await
        .unwrap();
    let calls = store.calls();
    assert!(matches!(
        &calls[1],
        Call::Dispatch(StoreAction::UpdateCuratedGroup(updated)) if updated.students.len() == 1
    ));
}

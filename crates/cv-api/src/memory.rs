//! In-memory group storage and search.
//!
//! [`MemoryBackend`] implements both [`GroupBackend`] and [`SearchBackend`]
//! over a [`Dataset`]. It behaves like the server: ordering and paging are
//! applied before results are returned, mutations are limited to the
//! current user's groups, and the inactive-affiliation filter is applied
//! only when the request carries it.
//!
//! # Access Pattern
//!
//! State sits behind a single [`RwLock`]. Every method clones what it
//! returns and never holds the lock across an `.await`.
//!
//! # Examples
//!
//! ```
//! use cv_api::MemoryBackend;
//! use cv_api::memory::Dataset;
//!
//! let dataset = Dataset::from_json(r#"{
//!     "students": [{ "sid": "1", "firstName": "Ann", "lastName": "Ito" }],
//!     "groups": [{ "id": 3, "name": "Advisees", "ownerUid": "2040", "sids": ["1"] }]
//! }"#)?;
//! let backend = MemoryBackend::new(dataset, "2040");
//! assert_eq!(backend.group_count(), 1);
//! # Ok::<(), cv_api::ApiError>(())
//! ```

use cv_core::{
    CuratedGroup, FxHashMap, FxHashSet, GroupId, GroupOwner, GroupSummary, OwnerGroups, Pagination,
    SearchResults, SortKey, Student, fx_hash_map, fx_hash_set, sort,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::backend::{GroupBackend, SearchBackend, SearchQuery};
use crate::error::{ApiError, ApiResult};
use crate::policy::GroupOperation;

/// Column header of a group CSV export.
pub const CSV_HEADER: &str = "first_name,last_name,sid,level,majors,cumulative_gpa,cumulative_units";

/// Seed data for a [`MemoryBackend`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Advisors that may own groups.
    #[serde(default)]
    pub users: Vec<GroupOwner>,
    /// Every known student, in roster order.
    #[serde(default)]
    pub students: Vec<Student>,
    /// Existing curated groups.
    #[serde(default)]
    pub groups: Vec<DatasetGroup>,
    /// Sids of students with unread alerts.
    #[serde(default)]
    pub alerts: Vec<String>,
}

impl Dataset {
    /// Parses a dataset from JSON.
    pub fn from_json(json: &str) -> ApiResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A curated group as stored in a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetGroup {
    /// Group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Campus user id of the owner.
    pub owner_uid: String,
    /// Member sids in insertion order.
    #[serde(default)]
    pub sids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fault {
    status: u16,
    message: String,
}

#[derive(Debug)]
struct MemoryState {
    owners: Vec<GroupOwner>,
    roster: Vec<String>,
    students: FxHashMap<String, Student>,
    groups: FxHashMap<GroupId, DatasetGroup>,
    alerts: FxHashSet<String>,
    faults: FxHashMap<GroupOperation, Fault>,
    /// `None` once every id has been handed out.
    next_id: Option<u32>,
}

/// Group storage and search over an in-memory [`Dataset`].
#[derive(Debug)]
pub struct MemoryBackend {
    uid: String,
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    /// Creates a backend acting on behalf of the user with `uid`.
    pub fn new(dataset: Dataset, uid: impl Into<String>) -> Self {
        let mut students = fx_hash_map();
        let mut roster = Vec::with_capacity(dataset.students.len());
        for student in dataset.students {
            roster.push(student.sid.clone());
            students.insert(student.sid.clone(), student);
        }

        let next_id = dataset
            .groups
            .iter()
            .map(|group| group.id.as_u32())
            .max()
            .map_or(Some(1), |id| id.checked_add(1));
        let mut groups = fx_hash_map();
        for group in dataset.groups {
            groups.insert(group.id, group);
        }

        let mut alerts = fx_hash_set();
        alerts.extend(dataset.alerts);

        Self {
            uid: uid.into(),
            state: RwLock::new(MemoryState {
                owners: dataset.users,
                roster,
                students,
                groups,
                alerts,
                faults: fx_hash_map(),
                next_id,
            }),
        }
    }

    /// Returns the uid requests are made on behalf of.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Makes the next call of `operation` fail with an HTTP error.
    pub fn fail_next(&self, operation: GroupOperation, status: u16, message: impl Into<String>) {
        self.state.write().faults.insert(
            operation,
            Fault {
                status,
                message: message.into(),
            },
        );
    }

    /// Returns the number of stored groups.
    pub fn group_count(&self) -> usize {
        self.state.read().groups.len()
    }

    fn take_fault(&self, operation: GroupOperation) -> ApiResult<()> {
        match self.state.write().faults.remove(&operation) {
            Some(fault) => {
                debug!(%operation, status = fault.status, "injected failure");
                Err(ApiError::http(fault.status, fault.message))
            }
            None => Ok(()),
        }
    }
}

impl MemoryState {
    fn owner_id(&self, uid: &str) -> Option<u32> {
        self.owners
            .iter()
            .find(|owner| owner.uid == uid)
            .map(|owner| owner.id)
    }

    fn group(&self, id: GroupId) -> ApiResult<&DatasetGroup> {
        self.groups
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format!("curated group {id}")))
    }

    fn owned_group_mut(&mut self, id: GroupId, uid: &str) -> ApiResult<&mut DatasetGroup> {
        let group = self
            .groups
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(format!("curated group {id}")))?;
        if group.owner_uid != uid {
            return Err(ApiError::http(
                403,
                format!("Current user does not own curated group {id}"),
            ));
        }
        Ok(group)
    }

    fn members(&self, group: &DatasetGroup) -> Vec<Student> {
        group
            .sids
            .iter()
            .filter_map(|sid| self.students.get(sid))
            .cloned()
            .collect()
    }

    fn to_record(&self, group: &DatasetGroup, students: Vec<Student>) -> CuratedGroup {
        let mut record = CuratedGroup::new(group.id, group.name.clone());
        record.owner_id = self.owner_id(&group.owner_uid);
        record.student_count = group.sids.len();
        record.students = students;
        record
    }

    fn full_record(&self, group: &DatasetGroup) -> CuratedGroup {
        self.to_record(group, self.members(group))
    }

    fn summaries_for(&self, uid: &str) -> Vec<GroupSummary> {
        let mut summaries: Vec<GroupSummary> = self
            .groups
            .values()
            .filter(|group| group.owner_uid == uid)
            .map(|group| GroupSummary {
                id: group.id,
                name: group.name.clone(),
                student_count: group.sids.len(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        summaries
    }
}

fn validate_name(name: &str) -> ApiResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::http(400, "Curated group name is required"));
    }
    Ok(name)
}

fn push_unique(sids: &mut Vec<String>, incoming: &[String]) {
    for sid in incoming {
        if !sids.contains(sid) {
            sids.push(sid.clone());
        }
    }
}

fn matches_phrase(student: &Student, words: &[String]) -> bool {
    let first = student.first_name.to_lowercase();
    let last = student.last_name.to_lowercase();
    words.iter().any(|word| {
        first.starts_with(word.as_str())
            || last.starts_with(word.as_str())
            || student.sid.starts_with(word.as_str())
    })
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_owned()
    }
}

fn csv_row(student: &Student) -> String {
    let majors = student.majors.join("; ");
    let gpa = student.cumulative_gpa.map(|gpa| format!("{gpa:.3}")).unwrap_or_default();
    let units = student.cumulative_units.map(|units| units.to_string()).unwrap_or_default();
    [
        escape_csv(&student.first_name),
        escape_csv(&student.last_name),
        escape_csv(&student.sid),
        escape_csv(student.level.description().unwrap_or_default()),
        escape_csv(&majors),
        gpa,
        units,
    ]
    .join(",")
}

impl GroupBackend for MemoryBackend {
    async fn create_group(&self, name: &str, sids: &[String]) -> ApiResult<CuratedGroup> {
        self.take_fault(GroupOperation::Create)?;
        let name = validate_name(name)?;
        let mut state = self.state.write();
        let Some(raw_id) = state.next_id else {
            return Err(ApiError::http(507, "No curated group ids left"));
        };
        let id = GroupId::new(raw_id);
        state.next_id = raw_id.checked_add(1);

        let mut group = DatasetGroup {
            id,
            name: name.to_owned(),
            owner_uid: self.uid.clone(),
            sids: Vec::with_capacity(sids.len()),
        };
        push_unique(&mut group.sids, sids);
        let record = state.full_record(&group);
        state.groups.insert(id, group);
        debug!(%id, "stored curated group");
        Ok(record)
    }

    async fn add_students(
        &self,
        id: GroupId,
        sids: &[String],
        return_student_profiles: bool,
    ) -> ApiResult<CuratedGroup> {
        self.take_fault(GroupOperation::AddStudents)?;
        let mut state = self.state.write();
        let group = state.owned_group_mut(id, &self.uid)?;
        push_unique(&mut group.sids, sids);
        let group = group.clone();
        Ok(if return_student_profiles {
            state.full_record(&group)
        } else {
            state.to_record(&group, Vec::new())
        })
    }

    async fn remove_student(&self, id: GroupId, sid: &str) -> ApiResult<CuratedGroup> {
        self.take_fault(GroupOperation::RemoveStudent)?;
        let mut state = self.state.write();
        let group = state.owned_group_mut(id, &self.uid)?;
        let before = group.sids.len();
        group.sids.retain(|member| member != sid);
        if group.sids.len() == before {
            return Err(ApiError::not_found(format!("student {sid} in curated group {id}")));
        }
        let group = group.clone();
        Ok(state.full_record(&group))
    }

    async fn delete_group(&self, id: GroupId) -> ApiResult<()> {
        self.take_fault(GroupOperation::Delete)?;
        let mut state = self.state.write();
        state.owned_group_mut(id, &self.uid)?;
        state.groups.remove(&id);
        Ok(())
    }

    async fn rename_group(&self, id: GroupId, name: &str) -> ApiResult<CuratedGroup> {
        self.take_fault(GroupOperation::Rename)?;
        let name = validate_name(name)?;
        let mut state = self.state.write();
        let group = state.owned_group_mut(id, &self.uid)?;
        name.clone_into(&mut group.name);
        let group = group.clone();
        Ok(state.full_record(&group))
    }

    async fn get_group(
        &self,
        id: GroupId,
        order_by: SortKey,
        page: Pagination,
    ) -> ApiResult<CuratedGroup> {
        self.take_fault(GroupOperation::FetchOne)?;
        let state = self.state.read();
        let group = state.group(id)?;
        let mut students = state.members(group);
        sort::sort_students(&mut students, order_by);
        let students = page.slice(&students).to_vec();
        trace!(%id, %order_by, shown = students.len(), "fetched curated group page");
        Ok(state.to_record(group, students))
    }

    async fn my_groups(&self) -> ApiResult<Vec<GroupSummary>> {
        self.take_fault(GroupOperation::FetchMine)?;
        Ok(self.state.read().summaries_for(&self.uid))
    }

    async fn my_group_ids_for_student(&self, sid: &str) -> ApiResult<Vec<GroupId>> {
        self.take_fault(GroupOperation::FetchGroupIdsForStudent)?;
        let state = self.state.read();
        let mut ids: Vec<GroupId> = state
            .groups
            .values()
            .filter(|group| group.owner_uid == self.uid && group.sids.iter().any(|s| s == sid))
            .map(|group| group.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn users_with_groups(&self) -> ApiResult<Vec<OwnerGroups>> {
        self.take_fault(GroupOperation::FetchAllWithOwners)?;
        let state = self.state.read();
        Ok(state
            .owners
            .iter()
            .map(|owner| OwnerGroups {
                user: owner.clone(),
                groups: state.summaries_for(&owner.uid),
            })
            .filter(|entry| !entry.groups.is_empty())
            .collect())
    }

    async fn download_csv(&self, id: GroupId) -> ApiResult<String> {
        self.take_fault(GroupOperation::ExportCsv)?;
        let state = self.state.read();
        let group = state.group(id)?;
        let mut students = state.members(group);
        sort::sort_students(&mut students, SortKey::LastName);

        let mut csv = String::from(CSV_HEADER);
        csv.push('\n');
        for student in &students {
            csv.push_str(&csv_row(student));
            csv.push('\n');
        }
        Ok(csv)
    }

    async fn students_with_alerts(&self, id: GroupId) -> ApiResult<Vec<Student>> {
        self.take_fault(GroupOperation::StudentsWithAlerts)?;
        let state = self.state.read();
        let group = state.group(id)?;
        Ok(state
            .members(group)
            .into_iter()
            .filter(|student| state.alerts.contains(&student.sid))
            .collect())
    }
}

impl SearchBackend for MemoryBackend {
    async fn search(&self, query: &SearchQuery) -> ApiResult<SearchResults> {
        self.take_fault(GroupOperation::Search)?;
        let words: Vec<String> = query
            .search_phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if words.is_empty() {
            return Err(ApiError::http(400, "Invalid search phrase"));
        }

        let state = self.state.read();
        let mut students: Vec<Student> = state
            .roster
            .iter()
            .filter_map(|sid| state.students.get(sid))
            .filter(|student| query.inactive_asc.admits(student.is_inactive_asc()))
            .filter(|student| matches_phrase(student, &words))
            .cloned()
            .collect();
        sort::sort_students(&mut students, query.order_by);

        let total_student_count = students.len();
        let page = Pagination::new(query.offset, query.limit.unwrap_or(usize::MAX));
        let students = page.slice(&students).to_vec();
        debug!(
            phrase = %query.search_phrase,
            total = total_student_count,
            returned = students.len(),
            "search"
        );
        Ok(SearchResults {
            students,
            total_student_count,
        })
    }
}

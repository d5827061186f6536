//! Shared application state for curated groups.
//!
//! The API wrapper publishes every successful mutation here so other views
//! (group menus, sidebars) stay current. [`Mutation`]s are synchronous
//! commits; [`StoreAction`]s are dispatched and may fan out further, like
//! recording an analytics event.

use cv_core::{CuratedGroup, GroupId, GroupSummary};
use parking_lot::RwLock;
use serde::Serialize;

/// A synchronous state change.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Replace a group's summary.
    UpdateCuratedGroup(CuratedGroup),
    /// Drop a group.
    DeleteCuratedGroup(GroupId),
}

/// A dispatched action.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    /// A group was created.
    CreateCuratedGroup(CuratedGroup),
    /// A group changed membership.
    UpdateCuratedGroup(CuratedGroup),
    /// Record an analytics event.
    CuratedEvent(CuratedEvent),
}

/// What happened to a curated group, for analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CuratedEventAction {
    /// The group was deleted.
    Delete,
    /// A student was removed.
    RemoveStudent,
    /// The group was renamed.
    Rename,
}

/// An analytics event about a curated group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuratedEvent {
    /// Group identifier.
    pub id: GroupId,
    /// Group name at the time of the event, when known.
    pub name: Option<String>,
    /// What happened.
    pub action: CuratedEventAction,
}

impl CuratedEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(id: GroupId, name: Option<String>, action: CuratedEventAction) -> Self {
        Self { id, name, action }
    }
}

/// Sink for curated group state changes.
pub trait AppStore: Send + Sync {
    /// Applies a mutation.
    fn commit(&self, mutation: Mutation);

    /// Dispatches an action.
    fn dispatch(&self, action: StoreAction);
}

#[derive(Debug, Default)]
struct StoreState {
    groups: Vec<GroupSummary>,
    events: Vec<CuratedEvent>,
}

/// In-process store holding the user's group list and analytics log.
///
/// # Examples
///
/// ```
/// use cv_api::{AppStore, MemoryStore, StoreAction};
/// use cv_core::{CuratedGroup, GroupId};
///
/// let store = MemoryStore::default();
/// store.dispatch(StoreAction::CreateCuratedGroup(CuratedGroup::new(GroupId::new(4), "Rowers")));
/// assert_eq!(store.groups()[0].name, "Rowers");
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Creates a store seeded with `groups`.
    #[must_use]
    pub fn with_groups(groups: Vec<GroupSummary>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                groups,
                events: Vec::new(),
            }),
        }
    }

    /// Returns a snapshot of the group list.
    #[must_use]
    pub fn groups(&self) -> Vec<GroupSummary> {
        self.state.read().groups.clone()
    }

    /// Returns a snapshot of the analytics log.
    #[must_use]
    pub fn events(&self) -> Vec<CuratedEvent> {
        self.state.read().events.clone()
    }

    fn upsert(&self, group: &CuratedGroup) {
        let summary = group.summary();
        let mut state = self.state.write();
        match state.groups.iter_mut().find(|existing| existing.id == summary.id) {
            Some(existing) => *existing = summary,
            None => state.groups.push(summary),
        }
    }
}

impl AppStore for MemoryStore {
    fn commit(&self, mutation: Mutation) {
        tracing::trace!(?mutation, "commit");
        match mutation {
            Mutation::UpdateCuratedGroup(group) => self.upsert(&group),
            Mutation::DeleteCuratedGroup(id) => {
                self.state.write().groups.retain(|group| group.id != id);
            }
        }
    }

    fn dispatch(&self, action: StoreAction) {
        tracing::trace!(?action, "dispatch");
        match action {
            StoreAction::CreateCuratedGroup(group) | StoreAction::UpdateCuratedGroup(group) => {
                self.upsert(&group);
            }
            StoreAction::CuratedEvent(event) => {
                tracing::debug!(id = %event.id, action = ?event.action, "curated group event");
                self.state.write().events.push(event);
            }
        }
    }
}

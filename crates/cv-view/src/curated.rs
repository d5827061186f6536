//! The curated cohort page.
//!
//! # State Machine
//!
//! ```text
//! Init ──► FetchGroup ──► GroupLoaded(Ok)  ──► tab from `v`
//!                     │                        ├── list:   done
//!                     │                        └── matrix: RefreshPlot ──► DataReady ──► done
//!                     └─► GroupLoaded(Err) ──► error shown, tabs untouched
//! ```
//!
//! Loading stays set while a plot refresh is outstanding; it is cleared by
//! the visualization's `DataReady`, not by the fetch.

use cv_api::ErrorMessage;
use cv_core::{
    CuratedConfig, CuratedGroup, CurrentUser, GroupId, Pagination, SortKey, SortOptions, Student,
    sort,
};
use smallvec::smallvec;
use tracing::{debug, info, warn};

use crate::effect::{Effect, Effects, Outcome, ViewModel};
use crate::error::ViewError;
use crate::location::{Location, ORDER_PARAM, TAB_PARAM};
use crate::plot::PlotEvent;
use crate::tab::Tab;

/// User intents on the curated cohort page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CuratedMsg {
    /// The page was opened.
    Init,
    /// A tab was clicked.
    SelectTab(Tab),
    /// A sort option was picked.
    SelectSort(SortKey),
    /// The remove button next to a student was clicked.
    Remove(String),
    /// A page of the group was requested.
    GoToPage(usize),
}

/// What the matrix view last reported.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSummary {
    /// Measure on the y axis.
    pub measure: String,
    /// Students rendered below the plot for lacking data.
    pub excluded: Vec<Student>,
}

/// View model of a curated cohort page.
#[derive(Debug)]
pub struct CuratedCohortView {
    id: GroupId,
    config: CuratedConfig,
    location: Location,
    group: Option<CuratedGroup>,
    tab: Tab,
    sort: SortOptions,
    page: Pagination,
    loading: bool,
    error: Option<ErrorMessage>,
    page_title: Option<String>,
    plot: Option<PlotSummary>,
    plot_generation: u64,
    awaiting_plot: bool,
    initialized: bool,
}

impl CuratedCohortView {
    /// Creates the view for group `id` at `location`.
    ///
    /// Sorting by team is offered when `user` belongs to
    /// `privileged_department`. A valid `o` parameter is restored.
    #[must_use]
    pub fn new(
        id: GroupId,
        location: Location,
        config: CuratedConfig,
        user: &CurrentUser,
        privileged_department: &str,
    ) -> Self {
        let mut sort = SortOptions::for_search(user.is_department_member(privileged_department));
        if let Some(param) = location.get(ORDER_PARAM) {
            sort.restore(param);
        }
        let page = Pagination::first(config.page_size);
        Self {
            id,
            config,
            location,
            group: None,
            tab: Tab::default(),
            sort,
            page,
            loading: false,
            error: None,
            page_title: None,
            plot: None,
            plot_generation: 0,
            awaiting_plot: false,
            initialized: false,
        }
    }

    /// Creates the view from the raw `:id` route parameter.
    pub fn from_route(
        raw_id: &str,
        location: Location,
        config: CuratedConfig,
        user: &CurrentUser,
        privileged_department: &str,
    ) -> Result<Self, ViewError> {
        let id = raw_id
            .parse::<GroupId>()
            .map_err(|_| ViewError::invalid_group_id(raw_id))?;
        Ok(Self::new(id, location, config, user, privileged_department))
    }

    /// Handles a user intent.
    pub fn update(&mut self, msg: CuratedMsg) -> Effects {
        match msg {
            CuratedMsg::Init => {
                self.loading = true;
                smallvec![self.fetch()]
            }
            CuratedMsg::SelectTab(tab) => self.select_tab(tab),
            CuratedMsg::SelectSort(key) => {
                if self.sort.select(key) {
                    self.location.set(ORDER_PARAM, key.as_str());
                    debug!(%key, "re-sorted curated cohort");
                }
                Effects::new()
            }
            CuratedMsg::Remove(sid) => {
                let Some(group) = &self.group else {
                    return Effects::new();
                };
                if !group.contains(&sid) {
                    warn!(%sid, id = %self.id, "remove requested for a student not in the group");
                    return Effects::new();
                }
                smallvec![Effect::RemoveStudent { id: self.id, sid }]
            }
            CuratedMsg::GoToPage(index) => {
                self.page = Pagination::for_page(index, self.config.page_size);
                self.loading = true;
                smallvec![self.fetch()]
            }
        }
    }

    fn fetch(&self) -> Effect {
        Effect::FetchGroup {
            id: self.id,
            order_by: self.sort.selected(),
            page: self.page,
        }
    }

    fn select_tab(&mut self, tab: Tab) -> Effects {
        self.tab = tab;
        self.location.set(TAB_PARAM, tab.as_str());
        match (tab, &self.group) {
            (Tab::Matrix, Some(_)) => smallvec![self.refresh_plot()],
            _ => Effects::new(),
        }
    }

    fn refresh_plot(&mut self) -> Effect {
        self.plot_generation += 1;
        self.loading = true;
        self.awaiting_plot = true;
        Effect::RefreshPlot {
            generation: self.plot_generation,
            students: self.displayed().into_iter().cloned().collect(),
        }
    }

    fn on_loaded(&mut self, group: CuratedGroup) -> Effects {
        info!(id = %group.id, students = group.students.len(), "loaded curated cohort");
        self.page_title = Some(group.title_or(&self.config.default_title).to_owned());
        self.group = Some(group);
        self.error = None;
        self.loading = false;

        if self.initialized {
            return if self.tab == Tab::Matrix {
                smallvec![self.refresh_plot()]
            } else {
                Effects::new()
            };
        }
        self.initialized = true;
        let tab = Tab::from_param(self.location.get(TAB_PARAM));
        self.select_tab(tab)
    }

    fn on_plot(&mut self, generation: u64, event: PlotEvent) {
        match event {
            PlotEvent::DataReady { measure, excluded } => {
                if generation != self.plot_generation {
                    debug!(generation, latest = self.plot_generation, "ignoring stale plot");
                    return;
                }
                self.plot = Some(PlotSummary { measure, excluded });
                self.awaiting_plot = false;
                self.loading = false;
            }
            PlotEvent::NavigationRequested(uid) => {
                let path = format!("{}{uid}", self.config.student_path);
                debug!(%path, "navigating to student");
                self.location.navigate(path);
            }
        }
    }

    /// Students in display order.
    #[must_use]
    pub fn displayed(&self) -> Vec<&Student> {
        self.group.as_ref().map_or_else(Vec::new, |group| {
            sort::sorted(&group.students, Some(self.sort.selected()))
        })
    }

    /// A window of the displayed students.
    #[must_use]
    pub fn page(&self, window: Pagination) -> Vec<&Student> {
        let displayed = self.displayed();
        displayed[window.window(displayed.len())].to_vec()
    }

    /// Returns the group id.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the loaded group.
    #[must_use]
    pub const fn group(&self) -> Option<&CuratedGroup> {
        self.group.as_ref()
    }

    /// Returns the active tab.
    #[must_use]
    pub const fn tab(&self) -> Tab {
        self.tab
    }

    /// Returns the sort menu.
    #[must_use]
    pub const fn sort(&self) -> &SortOptions {
        &self.sort
    }

    /// Returns the requested page.
    #[must_use]
    pub const fn current_page(&self) -> Pagination {
        self.page
    }

    /// Returns `true` while a fetch or plot refresh is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the error to show, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorMessage> {
        self.error.as_ref()
    }

    /// Returns the page title once the group has loaded.
    #[must_use]
    pub fn page_title(&self) -> Option<&str> {
        self.page_title.as_deref()
    }

    /// Returns the last plot report.
    #[must_use]
    pub const fn plot(&self) -> Option<&PlotSummary> {
        self.plot.as_ref()
    }

    /// Returns `true` while a plot refresh has not reported data.
    #[must_use]
    pub const fn is_awaiting_plot(&self) -> bool {
        self.awaiting_plot
    }

    /// Returns the current location.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }
}

impl ViewModel for CuratedCohortView {
    fn apply(&mut self, outcome: Outcome) -> Effects {
        match outcome {
            Outcome::GroupLoaded(Ok(group)) => self.on_loaded(group),
            Outcome::GroupLoaded(Err(error)) => {
                warn!(id = %self.id, %error, "failed to load curated cohort");
                self.error = Some(ErrorMessage::parse(&error));
                self.loading = false;
                Effects::new()
            }
            Outcome::StudentRemoved { sid, result } => {
                match result {
                    Ok(updated) => {
                        if let Some(group) = &mut self.group {
                            group.remove_student(&sid);
                            group.student_count = updated.student_count;
                        }
                        self.error = None;
                    }
                    Err(error) => {
                        warn!(%sid, %error, "failed to remove student");
                        self.error = Some(ErrorMessage::parse(&error));
                    }
                }
                Effects::new()
            }
            Outcome::Plot { generation, event } => {
                self.on_plot(generation, event);
                Effects::new()
            }
            Outcome::SearchCompleted { token, .. } => {
                debug!(%token, "curated cohort ignores search results");
                Effects::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cv_api::ApiError;
    use cv_core::{AcademicLevel, DepartmentMembership};

    use super::*;

    fn user(departments: &[&str]) -> CurrentUser {
        CurrentUser {
            uid: "2040".to_owned(),
            is_admin: false,
            departments: departments
                .iter()
                .map(|code| DepartmentMembership {
                    code: (*code).to_owned(),
                    is_advisor: true,
                    is_director: false,
                })
                .collect(),
        }
    }

    fn view(href: &str) -> CuratedCohortView {
        CuratedCohortView::new(
            GroupId::new(4),
            Location::parse(href),
            CuratedConfig::default(),
            &user(&[]),
            "UWASC",
        )
    }

    fn group(name: &str) -> CuratedGroup {
        let mut group = CuratedGroup::new(GroupId::new(4), name);
        let mut senior = Student::new("1", "Cy", "Annan");
        senior.level = AcademicLevel::Senior;
        senior.uid = Some("61889".to_owned());
        senior.cumulative_gpa = Some(3.4);
        senior.cumulative_units = Some(102.0);
        let mut freshman = Student::new("2", "Ann", "Ito");
        freshman.level = AcademicLevel::Freshman;
        let unknown = Student::new("3", "Bo", "Anders");
        group.students = vec![senior, freshman, unknown];
        group.student_count = 3;
        group
    }

    fn sids(view: &CuratedCohortView) -> Vec<&str> {
        view.displayed().iter().map(|s| s.sid.as_str()).collect()
    }

    #[test]
    fn test_init_fetches_with_selected_sort() {
        let mut view = view("/cohort/curated/4?o=gpa");
        let effects = view.update(CuratedMsg::Init);
        assert!(view.is_loading());
        assert_eq!(
            effects.as_slice(),
            [Effect::FetchGroup {
                id: GroupId::new(4),
                order_by: SortKey::Gpa,
                page: Pagination::first(50),
            }]
        );
    }

    #[test]
    fn test_loaded_defaults_to_list() {
        let mut view = view("/cohort/curated/4?v=grid");
        view.update(CuratedMsg::Init);
        let effects = view.apply(Outcome::GroupLoaded(Ok(group("Rowers"))));
        assert!(effects.is_empty());
        assert_eq!(view.tab(), Tab::List);
        assert_eq!(view.location().get("v"), Some("list"));
        assert_eq!(view.page_title(), Some("Rowers"));
        assert!(!view.is_loading());
    }

    #[test]
    fn test_empty_name_falls_back_to_default_title() {
        let mut view = view("/cohort/curated/4");
        view.apply(Outcome::GroupLoaded(Ok(group(""))));
        assert_eq!(view.page_title(), Some("Curated Cohort"));
    }

    #[test]
    fn test_failed_load_skips_tab_init() {
        let mut view = view("/cohort/curated/4?v=matrix");
        view.update(CuratedMsg::Init);
        let effects = view.apply(Outcome::GroupLoaded(Err(ApiError::not_found("curated group 4"))));
        assert!(effects.is_empty());
        assert_eq!(view.error().map(|e| e.status), Some(Some(404)));
        assert_eq!(view.tab(), Tab::List);
        assert_eq!(view.location().href(), "/cohort/curated/4?v=matrix");
        assert!(view.page_title().is_none());
    }

    #[test]
    fn test_matrix_clears_loading_only_on_data_ready() {
        let mut view = view("/cohort/curated/4?v=matrix");
        view.update(CuratedMsg::Init);
        let effects = view.apply(Outcome::GroupLoaded(Ok(group("Rowers"))));
        let [Effect::RefreshPlot { generation, students }] = effects.as_slice() else {
            panic!("expected a plot refresh, got {effects:?}");
        };
        assert_eq!(students.len(), 3);
        assert!(view.is_loading());
        assert!(view.is_awaiting_plot());

        view.apply(Outcome::Plot {
            generation: *generation,
            event: PlotEvent::DataReady {
                measure: "cumulative_gpa".to_owned(),
                excluded: Vec::new(),
            },
        });
        assert!(!view.is_loading());
        assert_eq!(view.plot().map(|p| p.measure.as_str()), Some("cumulative_gpa"));
    }

    #[test]
    fn test_stale_data_ready_is_ignored() {
        let mut view = view("/cohort/curated/4");
        view.apply(Outcome::GroupLoaded(Ok(group("Rowers"))));
        view.update(CuratedMsg::SelectTab(Tab::Matrix));
        view.update(CuratedMsg::SelectTab(Tab::Matrix));
        view.apply(Outcome::Plot {
            generation: 1,
            event: PlotEvent::DataReady {
                measure: "cumulative_gpa".to_owned(),
                excluded: Vec::new(),
            },
        });
        assert!(view.is_loading());
        view.apply(Outcome::Plot {
            generation: 2,
            event: PlotEvent::DataReady {
                measure: "cumulative_gpa".to_owned(),
                excluded: Vec::new(),
            },
        });
        assert!(!view.is_loading());
    }

    #[test]
    fn test_list_tab_never_refreshes() {
        let mut view = view("/cohort/curated/4");
        view.apply(Outcome::GroupLoaded(Ok(group("Rowers"))));
        assert!(view.update(CuratedMsg::SelectTab(Tab::List)).is_empty());
        assert_eq!(view.location().get("v"), Some("list"));
    }

    #[test]
    fn test_sort_selection_reorders_without_request() {
        let mut view = view("/cohort/curated/4");
        view.apply(Outcome::GroupLoaded(Ok(group("Rowers"))));
        assert_eq!(sids(&view), ["2", "3", "1"]);

        let effects = view.update(CuratedMsg::SelectSort(SortKey::Level));
        assert!(effects.is_empty());
        assert_eq!(sids(&view), ["3", "2", "1"]);
        assert_eq!(view.location().get("o"), Some("level"));
        assert_eq!(view.group().map(|g| g.students[0].sid.as_str()), Some("1"));
    }

    #[test]
    fn test_team_sort_requires_membership() {
        let mut plain = view("/cohort/curated/4?o=group_name");
        assert_eq!(plain.sort().selected(), SortKey::FirstName);
        assert!(plain.update(CuratedMsg::SelectSort(SortKey::GroupName)).is_empty());
        assert_eq!(plain.location().get("o"), Some("group_name"));
        assert_eq!(plain.sort().selected(), SortKey::FirstName);

        let asc = CuratedCohortView::new(
            GroupId::new(4),
            Location::parse("/cohort/curated/4?o=group_name"),
            CuratedConfig::default(),
            &user(&["UWASC"]),
            "UWASC",
        );
        assert_eq!(asc.sort().selected(), SortKey::GroupName);
    }

    #[test]
    fn test_remove_waits_for_confirmation() {
        let mut view = view("/cohort/curated/4");
        view.apply(Outcome::GroupLoaded(Ok(group("Rowers"))));
        let effects = view.update(CuratedMsg::Remove("2".to_owned()));
        assert_eq!(
            effects.as_slice(),
            [Effect::RemoveStudent {
                id: GroupId::new(4),
                sid: "2".to_owned(),
            }]
        );
        assert_eq!(view.displayed().len(), 3);

        let mut updated = group("Rowers");
        updated.remove_student("2");
        view.apply(Outcome::StudentRemoved {
            sid: "2".to_owned(),
            result: Ok(updated),
        });
        assert_eq!(sids(&view), ["3", "1"]);
        assert_eq!(view.group().map(|g| g.student_count), Some(2));
    }

    #[test]
    fn test_failed_remove_keeps_collection() {
        let mut view = view("/cohort/curated/4");
        view.apply(Outcome::GroupLoaded(Ok(group("Rowers"))));
        view.apply(Outcome::StudentRemoved {
            sid: "2".to_owned(),
            result: Err(ApiError::http(500, "")),
        });
        assert_eq!(view.displayed().len(), 3);
        assert_eq!(
            view.error().map(|e| e.message.as_str()),
            Some(ErrorMessage::GENERIC)
        );
    }

    #[test]
    fn test_remove_unknown_student_is_ignored() {
        let mut view = view("/cohort/curated/4");
        assert!(view.update(CuratedMsg::Remove("1".to_owned())).is_empty());
        view.apply(Outcome::GroupLoaded(Ok(group("Rowers"))));
        assert!(view.update(CuratedMsg::Remove("99".to_owned())).is_empty());
    }

    #[test]
    fn test_navigation_records_history() {
        let mut view = view("/cohort/curated/4?v=matrix");
        view.apply(Outcome::GroupLoaded(Ok(group("Rowers"))));
        view.apply(Outcome::Plot {
            generation: 1,
            event: PlotEvent::NavigationRequested("61889".to_owned()),
        });
        assert_eq!(view.location().path(), "/student/61889");
        assert_eq!(view.location().history_state(), Some("/cohort/curated/4?v=matrix"));
    }

    #[test]
    fn test_page_window() {
        let mut view = view("/cohort/curated/4");
        view.apply(Outcome::GroupLoaded(Ok(group("Rowers"))));
        let window: Vec<&str> = view
            .page(Pagination::new(1, 5))
            .iter()
            .map(|s| s.sid.as_str())
            .collect();
        assert_eq!(window, ["3", "1"]);
    }

    #[test]
    fn test_go_to_page_fetches_offset() {
        let mut view = view("/cohort/curated/4");
        let effects = view.update(CuratedMsg::GoToPage(2));
        assert_eq!(
            effects.as_slice(),
            [Effect::FetchGroup {
                id: GroupId::new(4),
                order_by: SortKey::FirstName,
                page: Pagination::new(100, 50),
            }]
        );
    }

    #[test]
    fn test_from_route_rejects_garbage() {
        let err = CuratedCohortView::from_route(
            "abc",
            Location::new("/cohort/curated/abc"),
            CuratedConfig::default(),
            &user(&[]),
            "UWASC",
        )
        .unwrap_err();
        assert!(matches!(err, ViewError::InvalidGroupId(_)));
    }
}

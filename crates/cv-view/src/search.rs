//! The student search page.
//!
//! The phrase comes from `q` and the sort selection from `o`. Changing the
//! sort re-runs the search from the first page, unless a search is already
//! in flight. Every request carries a [`RequestToken`]; only the outcome of
//! the most recent one is applied.

use cv_api::{ErrorMessage, SearchQuery};
use cv_core::{
    CurrentUser, InactiveAsc, Pagination, SearchConfig, SearchResults, SortKey, SortOptions,
    Student, sort,
};
use smallvec::smallvec;
use tracing::{debug, info, warn};

use crate::effect::{Effect, Effects, Outcome, RequestToken, ViewModel};
use crate::location::{Location, ORDER_PARAM, PHRASE_PARAM};

/// Message shown when the page is opened without a phrase.
pub const NO_SEARCH_INPUT: &str = "No search input found.";

/// User intents on the search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMsg {
    /// The page was opened.
    Init,
    /// A sort option was picked.
    SelectSort(SortKey),
    /// A results page was picked.
    GoToPage(usize),
}

/// View model of the search page.
#[derive(Debug)]
pub struct SearchView {
    config: SearchConfig,
    location: Location,
    phrase: Option<String>,
    inactive_asc: InactiveAsc,
    sort: SortOptions,
    page: Pagination,
    results: Option<SearchResults>,
    loading: bool,
    error: Option<ErrorMessage>,
    next_token: u64,
    latest: Option<RequestToken>,
}

impl SearchView {
    /// Creates the view at `location` for `user`.
    ///
    /// Members of the privileged department are offered the team sort and
    /// send an explicit inactive filter; everyone else leaves the filter to
    /// the server.
    #[must_use]
    pub fn new(location: Location, config: SearchConfig, user: &CurrentUser) -> Self {
        let is_member = user.is_department_member(&config.privileged_department);
        let inactive_asc = InactiveAsc::for_user(user, &config.privileged_department);
        let phrase = location
            .get(PHRASE_PARAM)
            .map(str::trim)
            .filter(|phrase| !phrase.is_empty())
            .map(str::to_owned);
        let mut sort = SortOptions::for_search(is_member);
        if let Some(param) = location.get(ORDER_PARAM) {
            sort.restore(param);
        }
        let page = Pagination::first(config.page_size);
        Self {
            config,
            location,
            phrase,
            inactive_asc,
            sort,
            page,
            results: None,
            loading: false,
            error: None,
            next_token: 0,
            latest: None,
        }
    }

    /// Handles a user intent.
    pub fn update(&mut self, msg: SearchMsg) -> Effects {
        match msg {
            SearchMsg::Init => self.search(),
            SearchMsg::SelectSort(key) => {
                if !self.sort.select(key) {
                    return Effects::new();
                }
                if self.loading {
                    debug!(%key, "search in flight; not re-running for sort change");
                    return Effects::new();
                }
                self.location.set(ORDER_PARAM, key.as_str());
                self.page = Pagination::first(self.config.page_size);
                self.search()
            }
            SearchMsg::GoToPage(index) => {
                self.page = Pagination::for_page(index, self.config.page_size);
                self.search()
            }
        }
    }

    fn search(&mut self) -> Effects {
        let Some(phrase) = &self.phrase else {
            self.error = Some(ErrorMessage::literal(NO_SEARCH_INPUT));
            return Effects::new();
        };
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        let query = SearchQuery::new(
            phrase.clone(),
            self.inactive_asc,
            self.sort.selected(),
            self.page,
            self.config.max_limit,
        );
        debug!(%token, phrase = %query.search_phrase, offset = query.offset, "searching");
        self.latest = Some(token);
        self.loading = true;
        smallvec![Effect::ScrollToTop, Effect::Search { token, query }]
    }

    /// Students in display order.
    #[must_use]
    pub fn displayed(&self) -> Vec<&Student> {
        self.results.as_ref().map_or_else(Vec::new, |results| {
            sort::sorted(&results.students, Some(self.sort.selected()))
        })
    }

    /// A window of the displayed students.
    #[must_use]
    pub fn page(&self, window: Pagination) -> Vec<&Student> {
        let displayed = self.displayed();
        displayed[window.window(displayed.len())].to_vec()
    }

    /// Returns the search phrase.
    #[must_use]
    pub fn phrase(&self) -> Option<&str> {
        self.phrase.as_deref()
    }

    /// Returns the inactive filter sent with every request.
    #[must_use]
    pub const fn inactive_asc(&self) -> InactiveAsc {
        self.inactive_asc
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

    /// Returns the number of result pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.results
            .as_ref()
            .map_or(0, |results| self.page.page_count(results.total_student_count))
    }

    /// Returns the last applied results.
    #[must_use]
    pub const fn results(&self) -> Option<&SearchResults> {
        self.results.as_ref()
    }

    /// Returns `true` while a search is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the error to show, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorMessage> {
        self.error.as_ref()
    }

    /// Returns the current location.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }
}

impl ViewModel for SearchView {
    fn apply(&mut self, outcome: Outcome) -> Effects {
        let Outcome::SearchCompleted { token, result } = outcome else {
            debug!("search page ignores non-search outcome");
            return Effects::new();
        };
        if self.latest != Some(token) {
            debug!(%token, latest = ?self.latest, "ignoring stale search response");
            return Effects::new();
        }
        self.loading = false;
        match result {
            Ok(results) => {
                info!(
                    total = results.total_student_count,
                    shown = results.students.len(),
                    "search results"
                );
                self.results = Some(results);
                self.error = None;
            }
            Err(error) if error.is_cancelled() => {
                debug!(%token, "search cancelled");
            }
            Err(error) => {
                warn!(%error, "search failed");
                self.error = Some(ErrorMessage::parse(&error));
            }
        }
        Effects::new()
    }
}

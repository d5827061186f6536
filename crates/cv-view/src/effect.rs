//! Effects requested by view models and the outcomes fed back to them.
//!
//! # Flow
//!
//! ```text
//! user intent → view.update() → Effects → Driver → Outcome → view.apply()
//! ```
//!
//! Views never perform I/O. They return [`Effect`]s and receive each
//! completed effect back as an [`Outcome`].

use std::fmt;

use cv_api::{ApiResult, SearchQuery};
use cv_core::{CuratedGroup, GroupId, Pagination, SearchResults, SortKey, Student};
use smallvec::SmallVec;

use crate::plot::PlotEvent;

/// Effects returned by a single update. Most updates return zero or one.
pub type Effects = SmallVec<[Effect; 2]>;

/// Sequence number of a search request.
///
/// Only the outcome carrying the latest token is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Work a view asks the driver to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch one page of a curated group.
    FetchGroup {
        /// Group to fetch.
        id: GroupId,
        /// Server-side ordering.
        order_by: SortKey,
        /// Page to fetch.
        page: Pagination,
    },
    /// Remove a student from a curated group.
    RemoveStudent {
        /// Group to mutate.
        id: GroupId,
        /// Student to remove.
        sid: String,
    },
    /// Run a student search. Supersedes any search still in flight.
    Search {
        /// Sequence number of this request.
        token: RequestToken,
        /// Request body.
        query: SearchQuery,
    },
    /// Lay out the scatterplot for `students`.
    RefreshPlot {
        /// Refresh sequence number.
        generation: u64,
        /// Students in display order.
        students: Vec<Student>,
    },
    /// Scroll the page back to the top.
    ScrollToTop,
}

impl Effect {
    /// Returns `true` if this effect is a network request.
    #[must_use]
    pub const fn is_request(&self) -> bool {
        matches!(
            self,
            Self::FetchGroup { .. } | Self::RemoveStudent { .. } | Self::Search { .. }
        )
    }
}

/// A completed effect.
#[derive(Debug)]
pub enum Outcome {
    /// A [`Effect::FetchGroup`] finished.
    GroupLoaded(ApiResult<CuratedGroup>),
    /// A [`Effect::RemoveStudent`] finished.
    StudentRemoved {
        /// The student the request removed.
        sid: String,
        /// Updated group or the failure.
        result: ApiResult<CuratedGroup>,
    },
    /// A [`Effect::Search`] finished or was cancelled.
    SearchCompleted {
        /// Token of the request.
        token: RequestToken,
        /// Results or the failure.
        result: ApiResult<SearchResults>,
    },
    /// The visualization reported an event for a refresh.
    Plot {
        /// Refresh sequence number the event belongs to.
        generation: u64,
        /// What happened.
        event: PlotEvent,
    },
}

/// A view model driven by [`Driver`](crate::Driver).
pub trait ViewModel {
    /// Applies a completed effect and returns follow-up effects.
    fn apply(&mut self, outcome: Outcome) -> Effects;
}

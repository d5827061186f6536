//! Student collection view models for cohort-view.
//!
//! A view model holds the state of one page: the collection, its ordering,
//! the active tab or search page, loading and error state. Its state is a
//! deterministic function of the raw students, the sort key, the view
//! mode, and the pagination offset, and it round-trips through the URL
//! query string.
//!
//! # Architecture
//!
//! ```text
//! CuratedCohortView ─┐                  ┌─ CuratedGroupApi (GroupBackend + AppStore)
//!                    ├─ Effects ► Driver ┼─ SearchBackend
//! SearchView ────────┘                  └─ Visualization
//! ```
//!
//! # Example
//!
//! ```
//! use cv_core::{CurrentUser, SearchConfig, SortKey};
//! use cv_view::{Location, SearchMsg, SearchView};
//!
//! let mut view = SearchView::new(
//!     Location::parse("/search?q=ann&o=gpa"),
//!     SearchConfig::default(),
//!     &CurrentUser::default(),
//! );
//! assert_eq!(view.sort().selected(), SortKey::Gpa);
//!
//! let effects = view.update(SearchMsg::Init);
//! assert!(view.is_loading());
//! assert_eq!(effects.len(), 2);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod curated;
pub mod driver;
pub mod effect;
pub mod error;
pub mod location;
pub mod plot;
pub mod search;
pub mod tab;

pub use curated::{CuratedCohortView, CuratedMsg, PlotSummary};
pub use driver::Driver;
pub use effect::{Effect, Effects, Outcome, RequestToken, ViewModel};
pub use error::ViewError;
pub use location::{Location, ORDER_PARAM, PHRASE_PARAM, TAB_PARAM};
pub use plot::{PlotEvent, ScatterplotPartitioner, Visualization};
pub use search::{SearchMsg, SearchView};
pub use tab::Tab;

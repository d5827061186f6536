//! Domain types for cohort-view.
//!
//! These are the typed shapes of the records the advising server returns.
//! Field names follow the server's camelCase JSON.
//!
//! # Module Organization
//!
//! - [`level`] - Academic level and its ordinal rank
//! - [`student`] - Student summary records
//! - [`group`] - Curated groups and their summaries
//! - [`search`] - Paged search results
//! - [`user`] - The signed-in user and the inactive-student filter
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use cv_core::{AcademicLevel, CuratedGroup, Student};
//! ```

pub mod group;
pub mod level;
pub mod search;
pub mod student;
pub mod user;

pub use group::{CuratedGroup, GroupId, GroupOwner, GroupSummary, OwnerGroups};
pub use level::AcademicLevel;
pub use search::SearchResults;
pub use student::{AthleticsProfile, Student, TeamMembership};
pub use user::{CurrentUser, DepartmentMembership, InactiveAsc};

//! Core types, errors, and utilities for cohort-view.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Domain types (`Student`, `CuratedGroup`, `SearchResults`, `CurrentUser`)
//! - The sort-key resolver and the stable student sorter
//! - Pagination windows over a displayed sequence
//! - Configuration structures and their errors
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod page;
pub mod sort;
pub mod types;

pub use config::{Config, CuratedConfig, ExportConfig, SearchConfig};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
pub use page::Pagination;
pub use sort::{SortKey, SortOption, SortOptions, SortValue};
pub use types::{
    AcademicLevel, AthleticsProfile, CuratedGroup, CurrentUser, DepartmentMembership, GroupId,
    GroupOwner, GroupSummary, InactiveAsc, OwnerGroups, SearchResults, Student, TeamMembership,
};

//! Collaborator contracts and the curated group API for cohort-view.
//!
//! # Architecture
//!
//! ```text
//! CuratedGroupApi
//!     ├── GroupBackend   (storage; MemoryBackend in-process)
//!     ├── AppStore       (commit/dispatch; MemoryStore in-process)
//!     └── FailurePolicy  (which failures reach the caller)
//!
//! SearchBackend          (student search; MemoryBackend in-process)
//! ```
//!
//! # Main Types
//!
//! - [`CuratedGroupApi`]: group operations that publish to the store
//! - [`GroupBackend`] / [`SearchBackend`]: async backend contracts
//! - [`AppStore`]: typed commit/dispatch entry points
//! - [`ApiError`] / [`ErrorMessage`]: transport errors and their display form

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod backend;
pub mod curated;
pub mod error;
pub mod export;
pub mod memory;
pub mod policy;
pub mod store;

pub use backend::{GroupBackend, SearchBackend, SearchQuery};
pub use curated::CuratedGroupApi;
pub use error::{ApiError, ApiResult, ErrorMessage};
pub use export::CsvExport;
pub use memory::MemoryBackend;
pub use policy::{FailurePolicy, GroupOperation};
pub use store::{AppStore, CuratedEvent, CuratedEventAction, MemoryStore, Mutation, StoreAction};

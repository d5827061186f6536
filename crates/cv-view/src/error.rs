//! View-layer error types.

use thiserror::Error;

/// Errors raised by view construction and the effect driver.
///
/// Backend failures are not errors at this level: views turn them into
/// [`ErrorMessage`](cv_api::ErrorMessage)s on their own state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ViewError {
    /// The route parameter is not a group id.
    #[error("invalid curated group id: {0:?}")]
    InvalidGroupId(String),

    /// A background effect task panicked or was aborted.
    #[error("effect task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ViewError {
    /// Creates a new [`ViewError::InvalidGroupId`] error.
    #[must_use]
    pub fn invalid_group_id(raw: impl Into<String>) -> Self {
        Self::InvalidGroupId(raw.into())
    }
}

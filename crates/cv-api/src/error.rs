//! Error types for the cv-api crate.
//!
//! [`ApiError`] is what a backend call fails with. [`ErrorMessage`] is what
//! a view shows: every transport error is parsed into one through
//! [`ErrorMessage::parse`], and guard errors that never reach the network
//! are built with [`ErrorMessage::literal`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result alias for backend and API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by group storage and search backends.
///
/// # Examples
///
/// ```
/// use cv_api::ApiError;
///
/// let err = ApiError::not_found("curated group 7");
/// assert_eq!(err.status(), Some(404));
/// assert_eq!(err.to_string(), "curated group 7 not found");
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The server answered with an error status.
    #[error("request failed with status {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, possibly empty.
        message: String,
    },

    /// The requested record does not exist.
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing record.
        what: String,
    },

    /// The user is not signed in or lacks permission.
    #[error("not authorized")]
    Unauthorized,

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request was superseded before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Creates a new [`ApiError::Http`] error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new [`ApiError::NotFound`] error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Returns the HTTP status this error corresponds to, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Unauthorized => Some(401),
            Self::Decode(_) | Self::Cancelled => None,
        }
    }

    /// Returns `true` for [`ApiError::NotFound`] and HTTP 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    /// Returns `true` if the request was cancelled rather than failed.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A user-displayable error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Text shown to the user.
    pub message: String,
    /// HTTP status, when the error came from a response.
    pub status: Option<u16>,
}

impl ErrorMessage {
    /// Fallback text for responses without a message.
    pub const GENERIC: &'static str = "Something went wrong. Please try again.";

    /// A message that did not come from a response.
    #[must_use]
    pub fn literal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Parses a backend error into the message a view shows.
    ///
    /// # Examples
    ///
    /// ```
    /// use cv_api::{ApiError, ErrorMessage};
    ///
    /// let shown = ErrorMessage::parse(&ApiError::http(500, ""));
    /// assert_eq!(shown.message, ErrorMessage::GENERIC);
    /// assert_eq!(shown.status, Some(500));
    /// ```
    #[must_use]
    pub fn parse(error: &ApiError) -> Self {
        let message = match error {
            ApiError::Http { message, .. } if message.trim().is_empty() => Self::GENERIC.to_owned(),
            ApiError::Http { message, .. } => message.clone(),
            ApiError::NotFound { what } => format!("Sorry, {what} was not found."),
            ApiError::Unauthorized => "You are not authorized to view this page.".to_owned(),
            ApiError::Decode(_) | ApiError::Cancelled => Self::GENERIC.to_owned(),
        };
        Self {
            message,
            status: error.status(),
        }
    }
}

impl From<&ApiError> for ErrorMessage {
    fn from(error: &ApiError) -> Self {
        Self::parse(error)
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

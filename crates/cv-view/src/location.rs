//! The browser location a view reads its state from and writes it back to.
//!
//! View state round-trips through the query string so that leaving a page
//! and coming back, or sharing the URL, reproduces the same view.

use std::fmt;

use url::form_urlencoded;

/// Query parameter holding the active tab.
pub const TAB_PARAM: &str = "v";
/// Query parameter holding the search phrase.
pub const PHRASE_PARAM: &str = "q";
/// Query parameter holding the sort selection.
pub const ORDER_PARAM: &str = "o";

/// A path with an ordered query string and optional history state.
///
/// # Examples
///
/// ```
/// use cv_view::Location;
///
/// let mut location = Location::parse("/cohort/curated/4?v=matrix&o=gpa");
/// assert_eq!(location.get("v"), Some("matrix"));
///
/// location.set("o", "level");
/// assert_eq!(location.href(), "/cohort/curated/4?v=matrix&o=level");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Vec<(String, String)>,
    history_state: Option<String>,
}

impl Location {
    /// Creates a location with an empty query string.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Parses `path?query`. A leading `?` alone is an empty query.
    #[must_use]
    pub fn parse(href: &str) -> Self {
        let (path, query) = href.split_once('?').unwrap_or((href, ""));
        Self {
            path: path.to_owned(),
            query: form_urlencoded::parse(query.as_bytes())
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect(),
            history_state: None,
        }
    }

    /// Returns the path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the first value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets `name`, replacing an existing value in place.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.query.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.query.push((name.to_owned(), value)),
        }
    }

    /// Removes every value of `name`.
    pub fn remove(&mut self, name: &str) {
        self.query.retain(|(key, _)| key != name);
    }

    /// Returns the encoded query string without the leading `?`.
    #[must_use]
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }

    /// Returns `path?query`, or the bare path when the query is empty.
    #[must_use]
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string())
        }
    }

    /// Returns the history state recorded by the last navigation.
    #[must_use]
    pub fn history_state(&self) -> Option<&str> {
        self.history_state.as_deref()
    }

    /// Moves to `path`, recording the current href as history state.
    pub fn navigate(&mut self, path: impl Into<String>) {
        let previous = self.href();
        self.path = path.into();
        self.query.clear();
        self.history_state = Some(previous);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decodes_values() {
        let location = Location::parse("/search?q=de%20la+cruz&o=last_name");
        assert_eq!(location.path(), "/search");
        assert_eq!(location.get("q"), Some("de la cruz"));
        assert_eq!(location.get("o"), Some("last_name"));
        assert_eq!(location.get("v"), None);
    }

    #[test]
    fn test_set_appends_then_replaces() {
        let mut location = Location::new("/search");
        location.set("q", "ann");
        location.set("o", "gpa");
        location.set("q", "bo");
        assert_eq!(location.href(), "/search?q=bo&o=gpa");
    }

    #[test]
    fn test_round_trip_encoding() {
        let mut location = Location::new("/search");
        location.set("q", "a&b=c d");
        insta::assert_snapshot!(location.href(), @"/search?q=a%26b%3Dc+d");
        let parsed = Location::parse(&location.href());
        assert_eq!(parsed.get("q"), Some("a&b=c d"));
    }

    #[test]
    fn test_remove() {
        let mut location = Location::parse("/x?v=list&o=gpa");
        location.remove("v");
        assert_eq!(location.href(), "/x?o=gpa");
        location.remove("o");
        assert_eq!(location.href(), "/x");
    }

    #[test]
    fn test_navigate_records_previous_href() {
        let mut location = Location::parse("/cohort/curated/4?v=matrix");
        location.navigate("/student/61889");
        assert_eq!(location.path(), "/student/61889");
        assert_eq!(location.get("v"), None);
        assert_eq!(location.history_state(), Some("/cohort/curated/4?v=matrix"));
    }
}

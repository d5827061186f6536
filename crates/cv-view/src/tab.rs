//! Curated cohort page tabs.

use std::fmt;

/// The view mode of a curated cohort page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    /// Tabular list of students.
    #[default]
    List,
    /// Scatterplot of students by GPA and units.
    Matrix,
}

impl Tab {
    /// Returns the URL spelling of the tab.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Matrix => "matrix",
        }
    }

    /// Parses a URL value. Anything but `list` or `matrix` is rejected.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "list" => Some(Self::List),
            "matrix" => Some(Self::Matrix),
            _ => None,
        }
    }

    /// Resolves the initial tab from an optional URL value.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_param() {
        assert_eq!(Tab::from_param(Some("matrix")), Tab::Matrix);
        assert_eq!(Tab::from_param(Some("list")), Tab::List);
        assert_eq!(Tab::from_param(Some("MATRIX")), Tab::List);
        assert_eq!(Tab::from_param(Some("grid")), Tab::List);
        assert_eq!(Tab::from_param(None), Tab::List);
    }
}

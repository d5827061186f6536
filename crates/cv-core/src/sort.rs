//! Sort keys and the stable student sorter.
//!
//! Every displayed student sequence is `sorted(collection, key)`. The
//! resolver turns a [`Student`] and a [`SortKey`] into a [`SortValue`]:
//!
//! | Key | Value |
//! |---|---|
//! | `first_name`, `last_name` | the name |
//! | `group_name` | name of the *first* team group, if any |
//! | `gpa`, `units` | the cumulative figure, if any |
//! | `level` | ordinal rank, `Unknown` = 0 |
//! | `major` | the *first* declared major, if any |
//!
//! Missing values sort after present ones. Sorting is stable, so students
//! with equal keys keep their input order across repeated re-sorts.
//!
//! # Examples
//!
//! ```
//! use cv_core::{AcademicLevel, SortKey, Student, sort};
//!
//! let mut senior = Student::new("1", "A", "A");
//! senior.level = AcademicLevel::Senior;
//! let mut freshman = Student::new("2", "B", "B");
//! freshman.level = AcademicLevel::Freshman;
//! let unknown = Student::new("3", "C", "C");
//!
//! let students = vec![senior, freshman, unknown];
//! let sids: Vec<_> = sort::sorted(&students, Some(SortKey::Level))
//!     .into_iter()
//!     .map(|s| s.sid.as_str())
//!     .collect();
//! assert_eq!(sids, ["3", "2", "1"]);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::Student;

/// A field by which a student sequence can be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// First athletic team group.
    GroupName,
    /// Cumulative GPA.
    Gpa,
    /// Academic level by ordinal rank.
    Level,
    /// First declared major.
    Major,
    /// Cumulative units.
    Units,
}

impl SortKey {
    /// Every sort key, in menu order.
    pub const ALL: [Self; 7] = [
        Self::FirstName,
        Self::LastName,
        Self::GroupName,
        Self::Gpa,
        Self::Level,
        Self::Major,
        Self::Units,
    ];

    /// Returns the wire/URL spelling of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::GroupName => "group_name",
            Self::Gpa => "gpa",
            Self::Level => "level",
            Self::Major => "major",
            Self::Units => "units",
        }
    }

    /// Parses the wire/URL spelling. Unknown spellings yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }

    /// Returns the menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::GroupName => "Team",
            Self::Gpa => "GPA",
            Self::Level => "Level",
            Self::Major => "Major",
            Self::Units => "Units Completed",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comparison key extracted from a student.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    /// Compared lexically, ignoring case.
    Text(&'a str),
    /// Compared numerically with a total order.
    Number(f64),
    /// Ordinal rank.
    Rank(u8),
}

impl<'a> SortValue<'a> {
    /// Resolves the comparison key for `student` under `key`.
    ///
    /// Returns `None` when the student has no value for the key.
    #[must_use]
    pub fn resolve(student: &'a Student, key: SortKey) -> Option<Self> {
        match key {
            SortKey::FirstName => Some(Self::Text(&student.first_name)),
            SortKey::LastName => Some(Self::Text(&student.last_name)),
            SortKey::GroupName => student.team_group_name().map(Self::Text),
            SortKey::Gpa => student.cumulative_gpa.map(Self::Number),
            SortKey::Level => Some(Self::Rank(student.level.rank())),
            SortKey::Major => student.first_major().map(Self::Text),
            SortKey::Units => student.cumulative_units.map(Self::Number),
        }
    }

    /// Resolves a key given by its URL spelling.
    ///
    /// An unrecognised spelling resolves every student to the empty string,
    /// which leaves the input order untouched.
    #[must_use]
    pub fn resolve_param(student: &'a Student, param: &str) -> Option<Self> {
        match SortKey::parse(param) {
            Some(key) => Self::resolve(student, key),
            None => Some(Self::Text("")),
        }
    }

    const fn discriminant(&self) -> u8 {
        match self {
            Self::Text(_) => 0,
            Self::Number(_) => 1,
            Self::Rank(_) => 2,
        }
    }

    /// Total order between two values.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => caseless(a).cmp(caseless(b)),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Rank(a), Self::Rank(b)) => a.cmp(b),
            _ => self.discriminant().cmp(&other.discriminant()),
        }
    }
}

fn caseless(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

/// Orders optional keys with missing values last.
#[must_use]
pub fn compare_keys(a: Option<&SortValue<'_>>, b: Option<&SortValue<'_>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Returns the indices of `students` in display order.
///
/// `None` keeps the input order.
#[must_use]
pub fn ordering(students: &[Student], key: Option<SortKey>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..students.len()).collect();
    let Some(key) = key else {
        return indices;
    };

    let keys: Vec<Option<SortValue<'_>>> = students
        .iter()
        .map(|student| SortValue::resolve(student, key))
        .collect();

    // `sort_by` is stable; ties keep input order.
    indices.sort_by(|&a, &b| compare_keys(keys[a].as_ref(), keys[b].as_ref()));
    indices
}

/// Returns references to `students` in display order.
#[must_use]
pub fn sorted(students: &[Student], key: Option<SortKey>) -> Vec<&Student> {
    ordering(students, key)
        .into_iter()
        .map(|index| &students[index])
        .collect()
}

/// Sorts `students` in place, stably.
pub fn sort_students(students: &mut [Student], key: SortKey) {
    students.sort_by(|a, b| {
        compare_keys(
            SortValue::resolve(a, key).as_ref(),
            SortValue::resolve(b, key).as_ref(),
        )
    });
}

/// One entry of a sort menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
    /// The key selected by this entry.
    pub value: SortKey,
    /// Menu label.
    pub label: &'static str,
}

impl From<SortKey> for SortOption {
    fn from(value: SortKey) -> Self {
        Self {
            value,
            label: value.label(),
        }
    }
}

/// The sort keys offered to the user and the current selection.
///
/// The selection is always one of the offered keys.
///
/// # Examples
///
/// ```
/// use cv_core::{SortKey, SortOptions};
///
/// let mut options = SortOptions::for_search(false);
/// assert_eq!(options.selected(), SortKey::FirstName);
///
/// // Restoring from a URL only accepts offered keys.
/// assert!(options.restore("gpa"));
/// assert!(!options.restore("group_name"));
/// assert!(!options.restore("nonexistent"));
/// assert_eq!(options.selected(), SortKey::Gpa);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOptions {
    options: Vec<SortOption>,
    selected: SortKey,
}

impl SortOptions {
    /// Creates a menu from `keys` with `selected` as the initial choice.
    ///
    /// If `selected` is not among `keys` the first key is selected instead.
    /// An empty `keys` falls back to offering `selected` alone.
    #[must_use]
    pub fn new(keys: &[SortKey], selected: SortKey) -> Self {
        let mut options: Vec<SortOption> = keys.iter().copied().map(SortOption::from).collect();
        if options.is_empty() {
            options.push(selected.into());
        }
        let selected = if options.iter().any(|option| option.value == selected) {
            selected
        } else {
            options[0].value
        };
        Self { options, selected }
    }

    /// The menu offered on search and cohort pages.
    ///
    /// Sorting by team is offered only to athletic study center users.
    #[must_use]
    pub fn for_search(include_team: bool) -> Self {
        let keys: Vec<SortKey> = SortKey::ALL
            .into_iter()
            .filter(|key| include_team || *key != SortKey::GroupName)
            .collect();
        Self::new(&keys, SortKey::FirstName)
    }

    /// Returns the offered entries.
    #[must_use]
    pub fn options(&self) -> &[SortOption] {
        &self.options
    }

    /// Returns the current selection.
    #[must_use]
    pub const fn selected(&self) -> SortKey {
        self.selected
    }

    /// Returns `true` if `key` is offered.
    #[must_use]
    pub fn offers(&self, key: SortKey) -> bool {
        self.options.iter().any(|option| option.value == key)
    }

    /// Selects `key` if it is offered. Returns `true` if the selection changed.
    pub fn select(&mut self, key: SortKey) -> bool {
        if !self.offers(key) || self.selected == key {
            return false;
        }
        self.selected = key;
        true
    }

    /// Restores the selection from a URL parameter.
    ///
    /// Unknown or unoffered values leave the selection untouched, so a stale
    /// URL never produces a selection the menu cannot show.
    pub fn restore(&mut self, param: &str) -> bool {
        SortKey::parse(param).is_some_and(|key| self.select(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AcademicLevel, AthleticsProfile, TeamMembership};

    fn sids<'a>(students: &[&'a Student]) -> Vec<&'a str> {
        students.iter().map(|s| s.sid.as_str()).collect()
    }

    fn with_level(sid: &str, level: AcademicLevel) -> Student {
        let mut student = Student::new(sid, "F", "L");
        student.level = level;
        student
    }

    fn with_majors(sid: &str, majors: &[&str]) -> Student {
        let mut student = Student::new(sid, "F", "L");
        student.majors = majors.iter().map(|m| (*m).to_owned()).collect();
        student
    }

    #[test]
    fn test_level_scenario() {
        let students = vec![
            with_level("1", AcademicLevel::Senior),
            with_level("2", AcademicLevel::Freshman),
            with_level("3", AcademicLevel::Unknown),
        ];
        assert_eq!(sids(&sorted(&students, Some(SortKey::Level))), ["3", "2", "1"]);
    }

    #[test]
    fn test_names_ignore_case() {
        let students = vec![
            Student::new("1", "Zed", "L"),
            Student::new("2", "de la Cruz", "L"),
            Student::new("3", "Amy", "L"),
            Student::new("4", "amy", "L"),
        ];
        assert_eq!(
            sids(&sorted(&students, Some(SortKey::FirstName))),
            ["3", "4", "2", "1"]
        );
    }

    #[test]
    fn test_level_is_ranked_not_alphabetical() {
        let students = vec![
            with_level("s", AcademicLevel::Sophomore),
            with_level("j", AcademicLevel::Junior),
            with_level("sr", AcademicLevel::Senior),
            with_level("f", AcademicLevel::Freshman),
        ];
        assert_eq!(
            sids(&sorted(&students, Some(SortKey::Level))),
            ["f", "s", "j", "sr"]
        );
    }

    #[test]
    fn test_major_uses_first_entry_only() {
        let students = vec![
            with_majors("1", &["Physics BA", "Art BA"]),
            with_majors("2", &["Economics BA"]),
            with_majors("3", &[]),
            with_majors("4", &["Anthropology BA", "Zoology BA"]),
        ];
        assert_eq!(
            sids(&sorted(&students, Some(SortKey::Major))),
            ["4", "2", "1", "3"]
        );
    }

    #[test]
    fn test_missing_values_sort_last_and_stable() {
        let mut a = Student::new("a", "F", "L");
        a.cumulative_gpa = Some(3.2);
        let b = Student::new("b", "F", "L");
        let mut c = Student::new("c", "F", "L");
        c.cumulative_gpa = Some(2.1);
        let d = Student::new("d", "F", "L");
        let students = vec![b, a, d, c];
        assert_eq!(
            sids(&sorted(&students, Some(SortKey::Gpa))),
            ["c", "a", "b", "d"]
        );
    }

    #[test]
    fn test_group_name_uses_first_team() {
        let mut rower = Student::new("r", "F", "L");
        rower.athletics_profile = Some(AthleticsProfile {
            athletics: ["Women's Rowing", "Beach Volleyball"]
                .iter()
                .map(|name| TeamMembership {
                    group_code: String::new(),
                    group_name: (*name).to_owned(),
                    team_code: String::new(),
                    team_name: String::new(),
                })
                .collect(),
            ..AthleticsProfile::default()
        });
        let mut diver = Student::new("d", "F", "L");
        diver.athletics_profile = Some(AthleticsProfile {
            athletics: std::iter::once(TeamMembership {
                group_code: String::new(),
                group_name: "Men's Diving".to_owned(),
                team_code: String::new(),
                team_name: String::new(),
            })
            .collect(),
            ..AthleticsProfile::default()
        });
        let non_athlete = Student::new("n", "F", "L");
        let students = vec![non_athlete, rower, diver];
        assert_eq!(
            sids(&sorted(&students, Some(SortKey::GroupName))),
            ["d", "r", "n"]
        );
    }

    #[test]
    fn test_no_key_keeps_input_order() {
        let students = vec![
            Student::new("z", "Zed", "Z"),
            Student::new("a", "Amy", "A"),
        ];
        assert_eq!(sids(&sorted(&students, None)), ["z", "a"]);
    }

    #[test]
    fn test_unknown_param_resolves_to_empty_text() {
        let student = Student::new("1", "Ann", "Bee");
        assert_eq!(
            SortValue::resolve_param(&student, "shoe_size"),
            Some(SortValue::Text(""))
        );
        assert_eq!(
            SortValue::resolve_param(&student, "first_name"),
            Some(SortValue::Text("Ann"))
        );
    }

    #[test]
    fn test_sort_students_in_place() {
        let mut students = vec![
            Student::new("1", "Cy", "L"),
            Student::new("2", "Al", "L"),
            Student::new("3", "Bo", "L"),
        ];
        sort_students(&mut students, SortKey::FirstName);
        let order: Vec<_> = students.iter().map(|s| s.sid.as_str()).collect();
        assert_eq!(order, ["2", "3", "1"]);
    }

    #[test]
    fn test_sort_key_round_trip_spelling() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(SortKey::parse("bogus"), None);
    }

    #[test]
    fn test_search_options_without_team() {
        let options = SortOptions::for_search(false);
        assert!(!options.offers(SortKey::GroupName));
        assert_eq!(options.options().len(), 6);
        assert!(SortOptions::for_search(true).offers(SortKey::GroupName));
    }

    #[test]
    fn test_select_ignores_unoffered() {
        let mut options = SortOptions::for_search(false);
        assert!(!options.select(SortKey::GroupName));
        assert!(options.select(SortKey::Units));
        assert!(!options.select(SortKey::Units));
        assert_eq!(options.selected(), SortKey::Units);
    }
}

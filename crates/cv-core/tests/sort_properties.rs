//! Property tests for the student sorter.

use cv_core::sort::{self, SortKey};
use cv_core::{AcademicLevel, Student};
use proptest::prelude::*;

fn level_strategy() -> impl Strategy<Value = AcademicLevel> {
    prop_oneof![
        Just(AcademicLevel::Unknown),
        Just(AcademicLevel::Freshman),
        Just(AcademicLevel::Sophomore),
        Just(AcademicLevel::Junior),
        Just(AcademicLevel::Senior),
    ]
}

fn student_strategy() -> impl Strategy<Value = Student> {
    (
        "[A-Ea-e]{0,3}",
        proptest::option::of(0.0f64..4.0),
        level_strategy(),
        proptest::collection::vec("[a-c]{1,2}", 0..3),
    )
        .prop_map(|(first_name, gpa, level, majors)| {
            let mut student = Student::new("", first_name, "L");
            student.cumulative_gpa = gpa;
            student.level = level;
            student.majors = majors.into_iter().collect();
            student
        })
}

fn students_strategy() -> impl Strategy<Value = Vec<Student>> {
    proptest::collection::vec(student_strategy(), 0..40).prop_map(|mut students| {
        for (index, student) in students.iter_mut().enumerate() {
            student.sid = index.to_string();
        }
        students
    })
}

proptest! {
    #[test]
    fn level_ranks_are_non_decreasing(students in students_strategy()) {
        let ordered = sort::sorted(&students, Some(SortKey::Level));
        for pair in ordered.windows(2) {
            prop_assert!(pair[0].level.rank() <= pair[1].level.rank());
        }
    }

    #[test]
    fn ordering_is_a_permutation(students in students_strategy()) {
        let mut indices = sort::ordering(&students, Some(SortKey::Gpa));
        indices.sort_unstable();
        let expected: Vec<usize> = (0..students.len()).collect();
        prop_assert_eq!(indices, expected);
    }

    #[test]
    fn ties_keep_input_order(students in students_strategy()) {
        // sids are input positions, so equal keys must appear with ascending sids.
        let ordered = sort::sorted(&students, Some(SortKey::FirstName));
        for pair in ordered.windows(2) {
            if pair[0].first_name.to_lowercase() == pair[1].first_name.to_lowercase() {
                let a: usize = pair[0].sid.parse().unwrap();
                let b: usize = pair[1].sid.parse().unwrap();
                prop_assert!(a < b);
            }
        }
    }

    #[test]
    fn missing_gpa_sorts_last(students in students_strategy()) {
        let ordered = sort::sorted(&students, Some(SortKey::Gpa));
        let first_missing = ordered.iter().position(|s| s.cumulative_gpa.is_none());
        if let Some(first_missing) = first_missing {
            prop_assert!(ordered[first_missing..].iter().all(|s| s.cumulative_gpa.is_none()));
        }
    }

    #[test]
    fn major_uses_first_entry(students in students_strategy()) {
        let ordered = sort::sorted(&students, Some(SortKey::Major));
        let majors: Vec<Option<&str>> = ordered.iter().map(|s| s.first_major()).collect();
        let present: Vec<&str> = majors.iter().flatten().copied().collect();
        let mut expected = present.clone();
        expected.sort_unstable();
        prop_assert_eq!(present, expected);
        let first_missing = majors.iter().position(Option::is_none).unwrap_or(majors.len());
        prop_assert!(majors[first_missing..].iter().all(Option::is_none));
    }

    #[test]
    fn names_are_ordered_ignoring_case(students in students_strategy()) {
        let ordered = sort::sorted(&students, Some(SortKey::FirstName));
        for pair in ordered.windows(2) {
            prop_assert!(pair[0].first_name.to_lowercase() <= pair[1].first_name.to_lowercase());
        }
    }

    #[test]
    fn resorting_is_idempotent(students in students_strategy()) {
        let once: Vec<Student> = sort::sorted(&students, Some(SortKey::Level))
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<&Student> = sort::sorted(&once, Some(SortKey::Level));
        let once_sids: Vec<&str> = once.iter().map(|s| s.sid.as_str()).collect();
        let twice_sids: Vec<&str> = twice.iter().map(|s| s.sid.as_str()).collect();
        prop_assert_eq!(once_sids, twice_sids);
    }
}

//! Unit tests for roster-types.

use proptest::prelude::*;
use test_case::test_case;

use super::*;

// ============================================================================
// StudentId
// ============================================================================

#[test]
fn student_id_displays_zero_padded() {
    assert_eq!(StudentId::new(7).to_string(), "S000007");
    assert_eq!(StudentId::new(1_234_567).to_string(), "S1234567");
}

#[test_case("S000001", 1 ; "display form")]
#[test_case("s000042", 42 ; "lowercase prefix")]
#[test_case("17", 17 ; "bare integer")]
#[test_case("  S3 ", 3 ; "surrounding whitespace")]
fn student_id_parses(input: &str, expected: u64) {
    assert_eq!(input.parse::<StudentId>(), Ok(StudentId::new(expected)));
}

#[test_case("" ; "empty")]
#[test_case("S" ; "prefix only")]
#[test_case("X12" ; "wrong prefix")]
#[test_case("S-1" ; "negative")]
#[test_case("a1b2c3d4" ; "uuid fragment")]
fn student_id_rejects(input: &str) {
    assert!(input.parse::<StudentId>().is_err());
}

#[test]
fn student_id_next_increments() {
    assert_eq!(StudentId::new(9).next(), StudentId::new(10));
}

// ============================================================================
// Capacity / Grade
// ============================================================================

#[test_case(1, true)]
#[test_case(30, true)]
#[test_case(0, false)]
#[test_case(-5, false)]
#[test_case(i64::from(u32::MAX) + 1, false ; "above u32 range")]
fn capacity_accepts_only_positive(value: i64, valid: bool) {
    assert_eq!(Capacity::new(value).is_some(), valid);
}

#[test_case(0, true)]
#[test_case(55, true)]
#[test_case(100, true)]
#[test_case(101, false)]
#[test_case(-1, false)]
fn grade_range_is_inclusive(value: i64, valid: bool) {
    assert_eq!(Grade::new(value).is_some(), valid);
}

// ============================================================================
// Aggregate
// ============================================================================

#[test]
fn aggregate_of_pending_only_is_no_grades() {
    let states = [GradeState::Pending, GradeState::Pending];
    let aggregate = Aggregate::from_states(&states);

    assert_eq!(aggregate, Aggregate::NoGrades);
    assert_eq!(aggregate.mean(), None);
    assert_eq!(aggregate.to_string(), "no grades yet");
}

#[test]
fn aggregate_mean_skips_pending() {
    let states = [
        GradeState::Assigned(Grade::new(80).unwrap()),
        GradeState::Pending,
        GradeState::Assigned(Grade::new(90).unwrap()),
    ];
    let aggregate = Aggregate::from_states(&states);

    assert_eq!(aggregate, Aggregate::Graded { total: 170, count: 2 });
    assert_eq!(aggregate.mean(), Some(85.0));
    assert_eq!(aggregate.to_string(), "85.00");
}

#[test]
fn grade_state_display() {
    assert_eq!(GradeState::Pending.to_string(), "pending");
    assert_eq!(
        GradeState::Assigned(Grade::new(73).unwrap()).to_string(),
        "73"
    );
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #[test]
    fn grade_accepts_exactly_zero_to_hundred(value in -1_000i64..1_000) {
        prop_assert_eq!(Grade::new(value).is_some(), (0..=100).contains(&value));
    }

    #[test]
    fn student_id_display_parses_back(raw in 0u64..10_000_000) {
        let id = StudentId::new(raw);
        prop_assert_eq!(id.to_string().parse::<StudentId>(), Ok(id));
    }

    #[test]
    fn aggregate_mean_is_within_grade_bounds(grades in prop::collection::vec(0i64..=100, 1..20)) {
        let states: Vec<GradeState> = grades
            .iter()
            .map(|g| GradeState::Assigned(Grade::new(*g).unwrap()))
            .collect();
        let mean = Aggregate::from_states(&states).mean().unwrap();

        prop_assert!((0.0..=100.0).contains(&mean));
    }
}

//! Main entry point for the Roster SDK.
//!
//! The `Roster` struct owns the kernel state and the audit trail. It is the
//! imperative shell around the pure kernel: commands go in, effects come
//! out and get executed here.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use roster_kernel::{Command, Effect, State, apply_committed};
use roster_types::{Aggregate, AuditAction, CourseId, StudentId};
use serde::Serialize;

use crate::error::{Result, RosterError};
use crate::view::{CourseView, StudentView};

/// One line of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    /// Position in the log, starting at 1.
    pub sequence: u64,
    pub action: AuditAction,
}

/// Internal state shared across clones of a `Roster`.
#[derive(Debug, Default)]
pub(crate) struct RosterInner {
    /// Kernel state machine.
    pub(crate) state: State,

    /// Append-only audit trail of successful mutations.
    pub(crate) audit_log: Vec<AuditEntry>,
}

impl RosterInner {
    /// Executes effects produced by the kernel.
    ///
    /// Records already live in the new kernel state; only the audit trail
    /// needs writing here. The rest is traced.
    fn execute_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::CourseWrite(course) => {
                    tracing::debug!(
                        course_id = %course.course_id,
                        enrolled = course.enrolled,
                        capacity = %course.capacity,
                        "course record written"
                    );
                }
                Effect::StudentWrite(student) => {
                    tracing::debug!(
                        student_id = %student.student_id,
                        enrollments = student.enrollments.len(),
                        "student record written"
                    );
                }
                Effect::AggregateComputed {
                    student_id,
                    aggregate,
                } => {
                    tracing::debug!(%student_id, %aggregate, "aggregate cached");
                }
                Effect::AuditLogAppend(action) => {
                    let sequence = self.audit_log.len() as u64 + 1;
                    tracing::info!(sequence, %action, "audit");
                    self.audit_log.push(AuditEntry {
                        sequence,
                        action: action.clone(),
                    });
                }
            }
        }
    }
}

/// The main Roster handle.
///
/// Cloning is cheap; clones share the same underlying data. Each command
/// runs under an exclusive lock, so the capacity check and the enrollment
/// counter increment can never interleave with another writer.
///
/// # Example
///
/// ```
/// use roster::{ErrorKind, Roster};
///
/// let roster = Roster::new();
/// roster.add_course("CS101", "Intro", 1)?;
/// let a = roster.add_student("A")?.to_string();
/// let b = roster.add_student("B")?.to_string();
///
/// roster.enroll(&a, "CS101")?;
/// let err = roster.enroll(&b, "CS101").unwrap_err();
/// assert_eq!(err.kind(), Some(ErrorKind::CapacityExceeded));
/// # Ok::<(), roster::RosterError>(())
/// ```
#[derive(Clone, Default)]
pub struct Roster {
    inner: Arc<RwLock<RosterInner>>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a roster preloaded with a small sample data set.
    ///
    /// Two courses (CS101, MA202) and two students, both enrolled in CS101.
    pub fn with_demo_data() -> Result<Self> {
        let roster = Self::new();
        roster.add_course("CS101", "Intro to Programming", 5)?;
        roster.add_course("MA202", "Calculus II", 3)?;
        let alice = roster.add_student("Alice Johnson")?;
        let bob = roster.add_student("Bob Smith")?;
        roster.submit(Command::enroll(alice, "CS101"))?;
        roster.submit(Command::enroll(bob, "CS101"))?;
        tracing::debug!("demo data loaded");
        Ok(roster)
    }

    /// Submits a command to the kernel and executes resulting effects.
    ///
    /// This is the core write path: command → kernel → effects. A rejected
    /// command leaves the roster exactly as it was.
    pub fn submit(&self, command: Command) -> Result<Vec<Effect>> {
        let mut inner = self.write()?;

        tracing::debug!(?command, "submitting command");
        let (new_state, effects) = match apply_committed(inner.state.clone(), command) {
            Ok(applied) => applied,
            Err(e) => {
                tracing::warn!(error = %e, kind = %e.kind(), "command rejected");
                return Err(e.into());
            }
        };

        inner.state = new_state;
        inner.execute_effects(&effects);

        // Capacity and reference invariants hold after every command
        debug_assert!(inner.state.check_invariants());

        tracing::trace!(effects = effects.len(), "command applied");

        Ok(effects)
    }

    // ========================================================================
    // Entity Store
    // ========================================================================

    /// Adds a course. Fails if the code is taken or capacity is not positive.
    pub fn add_course(&self, code: &str, name: &str, capacity: i64) -> Result<CourseView> {
        let course_id = CourseId::new(code);
        self.submit(Command::add_course(course_id.clone(), name, capacity))?;
        self.get_course(course_id.as_str())
    }

    /// Registers a student and returns the generated ID.
    pub fn add_student(&self, name: &str) -> Result<StudentId> {
        let effects = self.submit(Command::add_student(name))?;

        effects
            .iter()
            .find_map(|e| match e {
                Effect::StudentWrite(student) => Some(student.student_id),
                _ => None,
            })
            .ok_or_else(|| RosterError::internal("add-student produced no student record"))
    }

    /// Returns a snapshot of a course.
    pub fn get_course(&self, code: &str) -> Result<CourseView> {
        let course_id = CourseId::new(code);
        let inner = self.read()?;
        inner
            .state
            .get_course(&course_id)
            .map(CourseView::from)
            .ok_or_else(|| roster_kernel::KernelError::CourseNotFound(course_id).into())
    }

    /// Returns a snapshot of a student.
    pub fn get_student(&self, student: &str) -> Result<StudentView> {
        let student_id = parse_student_id(student)?;
        let inner = self.read()?;
        inner
            .state
            .get_student(&student_id)
            .map(|s| StudentView::new(s, inner.state.cached_aggregate(&student_id)))
            .ok_or_else(|| roster_kernel::KernelError::StudentNotFound(student_id).into())
    }

    /// Changes a course's name and capacity.
    pub fn update_course(&self, code: &str, name: &str, capacity: i64) -> Result<()> {
        self.submit(Command::update_course(code, name, capacity))?;
        Ok(())
    }

    /// Changes a student's name.
    pub fn update_student(&self, student: &str, name: &str) -> Result<()> {
        let student_id = parse_student_id(student)?;
        self.submit(Command::update_student(student_id, name))?;
        Ok(())
    }

    // ========================================================================
    // Enrollment & Grading
    // ========================================================================

    /// Enrolls a student in a course.
    pub fn enroll(&self, student: &str, code: &str) -> Result<()> {
        let student_id = parse_student_id(student)?;
        self.submit(Command::enroll(student_id, code))?;
        Ok(())
    }

    /// Assigns a grade (`0..=100`) for an existing enrollment.
    pub fn assign_grade(&self, student: &str, code: &str, grade: i64) -> Result<()> {
        let student_id = parse_student_id(student)?;
        self.submit(Command::assign_grade(student_id, code, grade))?;
        Ok(())
    }

    /// Computes, caches and returns a student's aggregate grade.
    pub fn compute_aggregate(&self, student: &str) -> Result<Aggregate> {
        let student_id = parse_student_id(student)?;
        let effects = self.submit(Command::compute_aggregate(student_id))?;

        effects
            .iter()
            .find_map(|e| match e {
                Effect::AggregateComputed { aggregate, .. } => Some(*aggregate),
                _ => None,
            })
            .ok_or_else(|| RosterError::internal("compute-aggregate produced no aggregate"))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Lists all courses ordered by code.
    pub fn list_courses(&self) -> Result<Vec<CourseView>> {
        let inner = self.read()?;
        Ok(inner.state.courses().values().map(CourseView::from).collect())
    }

    /// Lists all students ordered by ID.
    pub fn list_students(&self) -> Result<Vec<StudentView>> {
        let inner = self.read()?;
        Ok(inner
            .state
            .students()
            .values()
            .map(|s| StudentView::new(s, inner.state.cached_aggregate(&s.student_id)))
            .collect())
    }

    /// Total number of enrollments across all courses.
    pub fn total_enrollments(&self) -> Result<u64> {
        Ok(self.read()?.state.total_enrollments())
    }

    /// Returns a copy of the audit trail.
    pub fn audit_log(&self) -> Result<Vec<AuditEntry>> {
        Ok(self.read()?.audit_log.clone())
    }

    /// Returns a copy of the kernel state.
    pub fn snapshot(&self) -> Result<State> {
        Ok(self.read()?.state.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RosterInner>> {
        self.inner
            .read()
            .map_err(|_| RosterError::internal("lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RosterInner>> {
        self.inner
            .write()
            .map_err(|_| RosterError::internal("lock poisoned"))
    }
}

/// Parses a student ID given as text. Unparseable IDs cannot name any
/// student, so they are reported as unknown.
fn parse_student_id(raw: &str) -> Result<StudentId> {
    raw.parse()
        .map_err(|_| RosterError::UnknownStudentId(raw.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_kernel::ErrorKind;
    use roster_types::GradeState;

    fn roster_with_cs101(capacity: i64) -> Roster {
        let roster = Roster::new();
        roster.add_course("CS101", "Intro", capacity).unwrap();
        roster
    }

    #[test]
    fn add_course_returns_view() {
        let roster = Roster::new();

        let view = roster.add_course("CS101", "Intro", 30).unwrap();

        assert_eq!(view.course_id.as_str(), "CS101");
        assert_eq!(view.capacity, 30);
        assert_eq!(view.enrolled, 0);
        assert_eq!(view.seats_left(), 30);
    }

    #[test]
    fn add_student_returns_fresh_ids() {
        let roster = Roster::new();

        let a = roster.add_student("A").unwrap();
        let b = roster.add_student("B").unwrap();

        assert_ne!(a, b);
        assert_eq!(roster.list_students().unwrap().len(), 2);
    }

    #[test]
    fn get_unknown_entities_is_not_found() {
        let roster = Roster::new();

        let course_err = roster.get_course("NOPE").unwrap_err();
        let student_err = roster.get_student("S000099").unwrap_err();
        let garbage_err = roster.get_student("not-an-id").unwrap_err();

        assert_eq!(course_err.kind(), Some(ErrorKind::NotFound));
        assert_eq!(student_err.kind(), Some(ErrorKind::NotFound));
        assert_eq!(garbage_err.kind(), Some(ErrorKind::NotFound));
    }

    #[test]
    fn capacity_scenario() {
        let roster = roster_with_cs101(2);
        let a = roster.add_student("A").unwrap().to_string();
        let b = roster.add_student("B").unwrap().to_string();
        let c = roster.add_student("C").unwrap().to_string();

        roster.enroll(&a, "CS101").unwrap();
        roster.enroll(&b, "CS101").unwrap();
        let err = roster.enroll(&c, "CS101").unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::CapacityExceeded));
        assert_eq!(roster.get_course("CS101").unwrap().enrolled, 2);
    }

    #[test]
    fn rejected_command_leaves_state_and_audit_unchanged() {
        let roster = roster_with_cs101(5);
        let a = roster.add_student("A").unwrap().to_string();
        roster.enroll(&a, "CS101").unwrap();

        let state_before = roster.snapshot().unwrap();
        let audit_before = roster.audit_log().unwrap();

        let err = roster.enroll(&a, "CS101").unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::AlreadyEnrolled));
        assert_eq!(roster.snapshot().unwrap(), state_before);
        assert_eq!(roster.audit_log().unwrap(), audit_before);
    }

    #[test]
    fn grade_before_enrollment_is_not_enrolled() {
        let roster = Roster::new();
        let a = roster.add_student("A").unwrap().to_string();

        let err = roster.assign_grade(&a, "CS101", 50).unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::NotEnrolled));
    }

    #[test]
    fn out_of_range_grade_keeps_prior_grade() {
        let roster = roster_with_cs101(5);
        let a = roster.add_student("A").unwrap().to_string();
        roster.enroll(&a, "CS101").unwrap();
        roster.assign_grade(&a, "CS101", 64).unwrap();

        let err = roster.assign_grade(&a, "CS101", 101).unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::InvalidArgument));
        let student = roster.get_student(&a).unwrap();
        assert_eq!(
            student.enrollments[0].grade,
            GradeState::Assigned(roster_types::Grade::new(64).unwrap())
        );
    }

    #[test]
    fn aggregate_round_trip() {
        let roster = Roster::new();
        roster.add_course("CS101", "Intro", 5).unwrap();
        roster.add_course("MA202", "Calculus II", 5).unwrap();
        let a = roster.add_student("A").unwrap().to_string();

        assert_eq!(roster.compute_aggregate(&a).unwrap(), Aggregate::NoGrades);
        assert_eq!(roster.get_student(&a).unwrap().aggregate_label(), "no grades yet");

        roster.enroll(&a, "CS101").unwrap();
        roster.enroll(&a, "MA202").unwrap();
        roster.assign_grade(&a, "CS101", 80).unwrap();
        roster.assign_grade(&a, "MA202", 90).unwrap();

        let aggregate = roster.compute_aggregate(&a).unwrap();
        assert_eq!(aggregate.mean(), Some(85.0));
        assert_eq!(roster.get_student(&a).unwrap().aggregate_label(), "85.00");
    }

    #[test]
    fn aggregate_label_is_na_until_computed() {
        let roster = Roster::new();
        let a = roster.add_student("A").unwrap().to_string();

        assert_eq!(roster.get_student(&a).unwrap().aggregate_label(), "N/A");
    }

    #[test]
    fn updates_change_display_fields() {
        let roster = roster_with_cs101(5);
        let a = roster.add_student("A").unwrap().to_string();

        roster.update_student(&a, "Ada").unwrap();
        roster.update_course("CS101", "Intro to Rust", 10).unwrap();

        assert_eq!(roster.get_student(&a).unwrap().name, "Ada");
        let course = roster.get_course("CS101").unwrap();
        assert_eq!(course.name, "Intro to Rust");
        assert_eq!(course.capacity, 10);
    }

    #[test]
    fn update_course_rejects_zero_capacity() {
        let roster = roster_with_cs101(5);

        let err = roster.update_course("CS101", "Intro", 0).unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::InvalidArgument));
    }

    #[test]
    fn demo_data_matches_sample_set() {
        let roster = Roster::with_demo_data().unwrap();

        let courses = roster.list_courses().unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(roster.get_course("CS101").unwrap().enrolled, 2);
        assert_eq!(roster.get_course("MA202").unwrap().enrolled, 0);
        assert_eq!(roster.total_enrollments().unwrap(), 2);

        let names: Vec<String> = roster
            .list_students()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Alice Johnson", "Bob Smith"]);
    }

    #[test]
    fn audit_log_records_each_mutation_in_order() {
        let roster = roster_with_cs101(5);
        let a = roster.add_student("A").unwrap();
        roster.enroll(&a.to_string(), "CS101").unwrap();

        let log = roster.audit_log().unwrap();

        assert_eq!(log.len(), 3);
        assert_eq!(
            log.iter().map(|e| e.sequence).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert!(matches!(log[0].action, AuditAction::CourseAdded { .. }));
        assert!(matches!(log[1].action, AuditAction::StudentAdded { .. }));
        assert_eq!(
            log[2].action,
            AuditAction::StudentEnrolled {
                student_id: a,
                course_id: CourseId::new("CS101"),
            }
        );
    }

    #[test]
    fn concurrent_enrolls_respect_capacity() {
        let roster = roster_with_cs101(3);
        let ids: Vec<String> = (0..12)
            .map(|i| roster.add_student(&format!("student-{i}")).unwrap().to_string())
            .collect();

        let handles: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let roster = roster.clone();
                std::thread::spawn(move || roster.enroll(&id, "CS101").is_ok())
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 3);
        assert_eq!(roster.get_course("CS101").unwrap().enrolled, 3);
    }

    #[test]
    fn views_serialize_with_display_ids() {
        let roster = roster_with_cs101(5);
        let a = roster.add_student("Ada").unwrap().to_string();
        roster.enroll(&a, "CS101").unwrap();

        let json = serde_json::to_value(roster.get_student(&a).unwrap()).unwrap();

        assert_eq!(json["student_id"], "S000001");
        assert_eq!(json["enrollments"][0]["course_id"], "CS101");
        assert_eq!(json["enrollments"][0]["grade"], "pending");
        assert!(json["aggregate"].is_null());
    }
}

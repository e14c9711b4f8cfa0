//! Enrollment: the enroll-once, capacity-checked relation between a
//! student and a course.
//!
//! Capacity is checked against the course's own enrollment counter, never
//! a system-wide tally.

use roster_types::{AuditAction, CourseId, StudentId};

use crate::effects::Effect;
use crate::kernel::KernelError;
use crate::state::State;

/// Enrolls `student_id` in `course_id` with a pending grade.
///
/// Checks, in order: student exists, course exists, not already enrolled,
/// course not full.
pub fn enroll(
    state: State,
    student_id: StudentId,
    course_id: CourseId,
) -> Result<(State, Vec<Effect>), KernelError> {
    // Precondition: both entities exist
    let student = state
        .get_student(&student_id)
        .ok_or(KernelError::StudentNotFound(student_id))?;
    let course = state
        .get_course(&course_id)
        .ok_or_else(|| KernelError::CourseNotFound(course_id.clone()))?;

    // Precondition: the pair appears at most once
    if student.is_enrolled(&course_id) {
        return Err(KernelError::AlreadyEnrolled {
            student_id,
            course_id,
        });
    }

    // Precondition: a seat is free in this course
    if course.is_full() {
        return Err(KernelError::CapacityExceeded {
            course_id,
            capacity: course.capacity,
        });
    }

    let enrolled_before = course.enrolled;

    let new_state = state.with_enrollment(&student_id, &course_id);

    let (Some(student), Some(course)) = (
        new_state.get_student(&student_id),
        new_state.get_course(&course_id),
    ) else {
        unreachable!("enrollment parties vanished after validation");
    };

    // Invariant: counter advanced by exactly one and stays within capacity
    assert_eq!(course.enrolled, enrolled_before + 1);
    assert!(
        course.enrolled <= course.capacity.as_u32(),
        "course {} over capacity: {} > {}",
        course.course_id,
        course.enrolled,
        course.capacity
    );
    // Postcondition: new enrollment starts pending
    debug_assert!(
        student
            .grade_state(&course_id)
            .is_some_and(|g| !g.is_assigned())
    );

    let effects = vec![
        Effect::StudentWrite(student.clone()),
        Effect::CourseWrite(course.clone()),
        Effect::AuditLogAppend(AuditAction::StudentEnrolled {
            student_id,
            course_id,
        }),
    ];

    Ok((new_state, effects))
}

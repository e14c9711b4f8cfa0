//! Grading: grade assignment for enrolled pairs and per-student
//! aggregate grades.

use roster_types::{AuditAction, CourseId, Grade, StudentId};

use crate::effects::Effect;
use crate::kernel::KernelError;
use crate::state::State;

/// Assigns `grade` to an existing enrollment, overwriting any prior value.
///
/// Checks, in order: student exists, student is enrolled in the course,
/// grade is within `0..=100`.
pub fn assign_grade(
    state: State,
    student_id: StudentId,
    course_id: CourseId,
    grade: i64,
) -> Result<(State, Vec<Effect>), KernelError> {
    let student = state
        .get_student(&student_id)
        .ok_or(KernelError::StudentNotFound(student_id))?;

    // An enrollment implies the course exists, so no separate course lookup.
    let previous = student
        .grade_state(&course_id)
        .ok_or_else(|| KernelError::NotEnrolled {
            student_id,
            course_id: course_id.clone(),
        })?;

    let grade = Grade::new(grade).ok_or(KernelError::GradeOutOfRange(grade))?;

    let new_state = state.with_grade(&student_id, &course_id, grade);

    let Some(student) = new_state.get_student(&student_id) else {
        unreachable!("student {student_id} vanished after validation");
    };

    // Postcondition: the enrollment now carries the new grade
    debug_assert_eq!(
        student.grade_state(&course_id).and_then(|g| g.grade()),
        Some(grade)
    );

    let effects = vec![
        Effect::StudentWrite(student.clone()),
        Effect::AuditLogAppend(AuditAction::GradeAssigned {
            student_id,
            course_id,
            previous,
            grade,
        }),
    ];

    Ok((new_state, effects))
}

/// Computes the mean of a student's assigned grades and caches it.
pub fn compute_aggregate(
    state: State,
    student_id: StudentId,
) -> Result<(State, Vec<Effect>), KernelError> {
    let aggregate = state
        .get_student(&student_id)
        .ok_or(KernelError::StudentNotFound(student_id))?
        .aggregate();

    let new_state = state.with_aggregate(student_id, aggregate);

    // Postcondition: cache holds what was just computed
    debug_assert_eq!(new_state.cached_aggregate(&student_id), Some(aggregate));

    let effects = vec![
        Effect::AggregateComputed {
            student_id,
            aggregate,
        },
        Effect::AuditLogAppend(AuditAction::AggregateComputed {
            student_id,
            aggregate,
        }),
    ];

    Ok((new_state, effects))
}

//! The kernel - pure functional core of `Roster`.
//!
//! The kernel applies commands to produce new state and effects. It is
//! completely pure: no IO, no clocks, no randomness. This makes it
//! deterministic and easy to test.
//!
//! # Example
//!
//! ```ignore
//! let state = State::new();
//! let cmd = Command::add_course("CS101", "Intro", 30);
//!
//! let (new_state, effects) = apply_committed(state, cmd)?;
//! // Shell executes effects...
//! ```

use std::fmt::Display;

use roster_types::{AuditAction, Capacity, CourseId, StudentId};

use crate::command::Command;
use crate::effects::Effect;
use crate::state::{Course, State};
use crate::{enrollment, grading};

/// Applies a command to the state, producing new state and effects.
///
/// Takes ownership of state, returns new state. On error the input state is
/// consumed; callers that need to keep it apply against a clone.
pub fn apply_committed(state: State, cmd: Command) -> Result<(State, Vec<Effect>), KernelError> {
    let mut effects = Vec::new();

    match cmd {
        // ====================================================================
        // Entity Store Commands
        // ====================================================================
        Command::AddCourse {
            course_id,
            name,
            capacity,
        } => {
            // Precondition: course code is unique
            if state.course_exists(&course_id) {
                return Err(KernelError::CourseIdUniqueConstraint(course_id));
            }

            // Precondition: capacity is positive
            let capacity = checked_capacity(capacity)?;

            let course = Course::new(course_id.clone(), name.clone(), capacity);

            effects.push(Effect::CourseWrite(course.clone()));
            effects.push(Effect::AuditLogAppend(AuditAction::CourseAdded {
                course_id: course_id.clone(),
                name,
                capacity,
            }));

            let new_state = state.with_course(course);

            // Postcondition: course exists with an empty roster
            debug_assert!(
                new_state
                    .get_course(&course_id)
                    .is_some_and(|c| c.enrolled == 0)
            );

            Ok((new_state, effects))
        }

        Command::AddStudent { name } => {
            let (new_state, student) = state.with_new_student(name.clone());

            // Postcondition: allocated student exists with no enrollments
            debug_assert!(
                new_state
                    .get_student(&student.student_id)
                    .is_some_and(|s| s.enrollments.is_empty())
            );

            let student_id = student.student_id;
            effects.push(Effect::StudentWrite(student));
            effects.push(Effect::AuditLogAppend(AuditAction::StudentAdded {
                student_id,
                name,
            }));

            // Postcondition: exactly 2 effects (record + audit)
            debug_assert_eq!(effects.len(), 2);

            Ok((new_state, effects))
        }

        Command::UpdateCourse {
            course_id,
            name,
            capacity,
        } => {
            // Precondition: course exists
            let course = state
                .get_course(&course_id)
                .ok_or_else(|| KernelError::CourseNotFound(course_id.clone()))?;

            // Precondition: capacity is positive
            let requested = checked_capacity(capacity)?;

            // Precondition: shrinking never strands enrolled students
            if requested.as_u32() < course.enrolled {
                return Err(KernelError::CapacityBelowEnrollment {
                    course_id,
                    requested,
                    enrolled: course.enrolled,
                });
            }

            let new_state = state.with_course_details(&course_id, name.clone(), requested);

            let Some(updated) = new_state.get_course(&course_id) else {
                unreachable!("course {course_id} vanished after validation");
            };

            effects.push(Effect::CourseWrite(updated.clone()));
            effects.push(Effect::AuditLogAppend(AuditAction::CourseUpdated {
                course_id,
                name,
                capacity: requested,
            }));

            Ok((new_state, effects))
        }

        Command::UpdateStudent { student_id, name } => {
            // Precondition: student exists
            if !state.student_exists(&student_id) {
                return Err(KernelError::StudentNotFound(student_id));
            }

            let new_state = state.with_student_name(&student_id, name.clone());

            let Some(updated) = new_state.get_student(&student_id) else {
                unreachable!("student {student_id} vanished after validation");
            };

            // Postcondition: only the name changed
            debug_assert_eq!(updated.name, name);

            effects.push(Effect::StudentWrite(updated.clone()));
            effects.push(Effect::AuditLogAppend(AuditAction::StudentUpdated {
                student_id,
                name,
            }));

            Ok((new_state, effects))
        }

        // ====================================================================
        // Enrollment Commands
        // ====================================================================
        Command::Enroll {
            student_id,
            course_id,
        } => enrollment::enroll(state, student_id, course_id),

        // ====================================================================
        // Grading Commands
        // ====================================================================
        Command::AssignGrade {
            student_id,
            course_id,
            grade,
        } => grading::assign_grade(state, student_id, course_id, grade),

        Command::ComputeAggregate { student_id } => grading::compute_aggregate(state, student_id),
    }
}

fn checked_capacity(capacity: i64) -> Result<Capacity, KernelError> {
    if capacity <= 0 {
        return Err(KernelError::InvalidCapacity(capacity));
    }
    Capacity::new(capacity).ok_or(KernelError::CapacityTooLarge(capacity))
}

/// Applies a sequence of commands, stopping at the first failure.
///
/// Effects from all applied commands are returned in order.
pub fn apply_committed_batch(
    state: State,
    commands: impl IntoIterator<Item = Command>,
) -> Result<(State, Vec<Effect>), KernelError> {
    let mut state = state;
    let mut all_effects = Vec::new();

    for cmd in commands {
        let (new_state, effects) = apply_committed(state, cmd)?;
        state = new_state;
        all_effects.extend(effects);
    }

    Ok((state, all_effects))
}

/// Errors that can occur when applying commands to the kernel.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    // Lookup errors
    #[error("course {0} not found")]
    CourseNotFound(CourseId),

    #[error("student {0} not found")]
    StudentNotFound(StudentId),

    // Uniqueness errors
    #[error("course {0} already exists")]
    CourseIdUniqueConstraint(CourseId),

    // Argument errors
    #[error("capacity must be a positive number, got {0}")]
    InvalidCapacity(i64),

    #[error("capacity must be at most {max}, got {0}", max = u32::MAX)]
    CapacityTooLarge(i64),

    #[error("capacity {requested} for course {course_id} is below its {enrolled} current enrollments")]
    CapacityBelowEnrollment {
        course_id: CourseId,
        requested: Capacity,
        enrolled: u32,
    },

    #[error("grade must be between 0 and 100, got {0}")]
    GradeOutOfRange(i64),

    // Relation errors
    #[error("student {student_id} is already enrolled in {course_id}")]
    AlreadyEnrolled {
        student_id: StudentId,
        course_id: CourseId,
    },

    #[error("student {student_id} is not enrolled in {course_id}")]
    NotEnrolled {
        student_id: StudentId,
        course_id: CourseId,
    },

    #[error("course {course_id} has reached its maximum capacity of {capacity}")]
    CapacityExceeded {
        course_id: CourseId,
        capacity: Capacity,
    },
}

impl KernelError {
    /// Classifies the error into the coarse failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KernelError::CourseNotFound(_) | KernelError::StudentNotFound(_) => {
                ErrorKind::NotFound
            }
            KernelError::CourseIdUniqueConstraint(_) => ErrorKind::DuplicateKey,
            KernelError::InvalidCapacity(_)
            | KernelError::CapacityTooLarge(_)
            | KernelError::CapacityBelowEnrollment { .. }
            | KernelError::GradeOutOfRange(_) => ErrorKind::InvalidArgument,
            KernelError::AlreadyEnrolled { .. } => ErrorKind::AlreadyEnrolled,
            KernelError::NotEnrolled { .. } => ErrorKind::NotEnrolled,
            KernelError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
        }
    }
}

/// Coarse classification of kernel failures. All are recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    DuplicateKey,
    InvalidArgument,
    AlreadyEnrolled,
    NotEnrolled,
    CapacityExceeded,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::DuplicateKey => "duplicate key",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::AlreadyEnrolled => "already enrolled",
            ErrorKind::NotEnrolled => "not enrolled",
            ErrorKind::CapacityExceeded => "capacity exceeded",
        };
        f.write_str(name)
    }
}

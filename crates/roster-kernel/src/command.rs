//! Commands accepted by the kernel.
//!
//! Numeric arguments (`capacity`, `grade`) arrive unvalidated so that the
//! kernel can check them in the documented order alongside the entity
//! lookups they depend on.

use roster_types::{CourseId, StudentId};
use serde::{Deserialize, Serialize};

/// An administrative command to apply to the kernel state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    // ========================================================================
    // Entity Store
    // ========================================================================
    /// Register a new course with a caller-chosen code.
    AddCourse {
        course_id: CourseId,
        name: String,
        capacity: i64,
    },

    /// Register a new student. The kernel allocates the ID.
    AddStudent { name: String },

    /// Change a course's display name and capacity.
    UpdateCourse {
        course_id: CourseId,
        name: String,
        capacity: i64,
    },

    /// Change a student's display name.
    UpdateStudent { student_id: StudentId, name: String },

    // ========================================================================
    // Enrollment
    // ========================================================================
    /// Enroll a student in a course with a pending grade.
    Enroll {
        student_id: StudentId,
        course_id: CourseId,
    },

    // ========================================================================
    // Grading
    // ========================================================================
    /// Assign (or reassign) a grade for an existing enrollment.
    AssignGrade {
        student_id: StudentId,
        course_id: CourseId,
        grade: i64,
    },

    /// Recompute and cache a student's aggregate grade.
    ComputeAggregate { student_id: StudentId },
}

impl Command {
    pub fn add_course(
        course_id: impl Into<CourseId>,
        name: impl Into<String>,
        capacity: i64,
    ) -> Self {
        Command::AddCourse {
            course_id: course_id.into(),
            name: name.into(),
            capacity,
        }
    }

    pub fn add_student(name: impl Into<String>) -> Self {
        Command::AddStudent { name: name.into() }
    }

    pub fn update_course(
        course_id: impl Into<CourseId>,
        name: impl Into<String>,
        capacity: i64,
    ) -> Self {
        Command::UpdateCourse {
            course_id: course_id.into(),
            name: name.into(),
            capacity,
        }
    }

    pub fn update_student(student_id: StudentId, name: impl Into<String>) -> Self {
        Command::UpdateStudent {
            student_id,
            name: name.into(),
        }
    }

    pub fn enroll(student_id: StudentId, course_id: impl Into<CourseId>) -> Self {
        Command::Enroll {
            student_id,
            course_id: course_id.into(),
        }
    }

    pub fn assign_grade(
        student_id: StudentId,
        course_id: impl Into<CourseId>,
        grade: i64,
    ) -> Self {
        Command::AssignGrade {
            student_id,
            course_id: course_id.into(),
            grade,
        }
    }

    pub fn compute_aggregate(student_id: StudentId) -> Self {
        Command::ComputeAggregate { student_id }
    }
}

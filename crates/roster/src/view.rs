//! Read-only snapshots handed out by the facade.
//!
//! Views are detached copies: holding one never pins or exposes the live
//! state, and changing one has no effect on the roster.

use std::fmt::Display;

use roster_kernel::{Course, Student};
use roster_types::{Aggregate, CourseId, GradeState, StudentId};
use serde::{Serialize, Serializer};

/// Serializes a value through its `Display` impl.
pub(crate) fn as_display<T: Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub(crate) fn as_optional_display<T: Display, S: Serializer>(
    value: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_none(),
    }
}

/// Snapshot of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseView {
    #[serde(serialize_with = "as_display")]
    pub course_id: CourseId,
    pub name: String,
    pub capacity: u32,
    pub enrolled: u32,
}

impl CourseView {
    pub fn seats_left(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled)
    }
}

impl From<&Course> for CourseView {
    fn from(course: &Course) -> Self {
        Self {
            course_id: course.course_id.clone(),
            name: course.name.clone(),
            capacity: course.capacity.as_u32(),
            enrolled: course.enrolled,
        }
    }
}

/// One enrollment of a student, with its grade state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentView {
    #[serde(serialize_with = "as_display")]
    pub course_id: CourseId,
    #[serde(serialize_with = "as_display")]
    pub grade: GradeState,
}

/// Snapshot of a student, their enrollments, and the cached aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentView {
    #[serde(serialize_with = "as_display")]
    pub student_id: StudentId,
    pub name: String,
    pub enrollments: Vec<EnrollmentView>,
    /// Last computed aggregate; `None` until `compute-aggregate` runs.
    #[serde(serialize_with = "as_optional_display")]
    pub aggregate: Option<Aggregate>,
}

impl StudentView {
    pub(crate) fn new(student: &Student, aggregate: Option<Aggregate>) -> Self {
        Self {
            student_id: student.student_id,
            name: student.name.clone(),
            enrollments: student
                .enrollments
                .iter()
                .map(|(course_id, grade)| EnrollmentView {
                    course_id: course_id.clone(),
                    grade: *grade,
                })
                .collect(),
            aggregate,
        }
    }

    /// Comma-separated `CODE (grade)` entries, e.g. `CS101 (88), MA202 (pending)`,
    /// or "None" when not enrolled anywhere.
    pub fn enrolled_label(&self) -> String {
        if self.enrollments.is_empty() {
            return "None".to_string();
        }
        self.enrollments
            .iter()
            .map(|e| format!("{} ({})", e.course_id, e.grade))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Cached aggregate formatted for display, `N/A` if never computed.
    pub fn aggregate_label(&self) -> String {
        self.aggregate
            .map_or_else(|| "N/A".to_string(), |a| a.to_string())
    }
}

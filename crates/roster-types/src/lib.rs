//! # roster-types: Core types for `Roster`
//!
//! This crate contains shared types used across the `Roster` system:
//! - Entity IDs ([`CourseId`], [`StudentId`])
//! - Validated scalars ([`Capacity`], [`Grade`])
//! - Enrollment grade tracking ([`GradeState`], [`Aggregate`])
//! - Audit actions ([`AuditAction`])

use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

// ============================================================================
// Entity IDs
// ============================================================================

/// Identifier for a course (e.g. `CS101`).
///
/// Course codes are chosen by the administrator when the course is added
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CourseId {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<&str> for CourseId {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<CourseId> for String {
    fn from(value: CourseId) -> Self {
        value.0
    }
}

/// System-generated identifier for a student.
///
/// Allocated sequentially by the kernel. Rendered as `S` followed by six
/// zero-padded digits, e.g. `S000042`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct StudentId(u64);

impl StudentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{:06}", self.0)
    }
}

impl From<u64> for StudentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<StudentId> for u64 {
    fn from(id: StudentId) -> Self {
        id.0
    }
}

/// Error returned when a string is not a valid [`StudentId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid student id '{0}' (expected e.g. S000001)")]
pub struct ParseStudentIdError(String);

impl FromStr for StudentId {
    type Err = ParseStudentIdError;

    /// Accepts the display form (`S000001`, case-insensitive prefix) or a
    /// bare integer (`1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('S')
            .or_else(|| trimmed.strip_prefix('s'))
            .unwrap_or(trimmed);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseStudentIdError(s.to_string()));
        }

        digits
            .parse::<u64>()
            .map(StudentId)
            .map_err(|_| ParseStudentIdError(s.to_string()))
    }
}

// ============================================================================
// Validated Scalars
// ============================================================================

/// Maximum number of students a course accepts. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Capacity(u32);

impl Capacity {
    /// Returns `None` unless `value` is in `1..=u32::MAX`.
    pub fn new(value: i64) -> Option<Self> {
        u32::try_from(value).ok().filter(|v| *v > 0).map(Self)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A numeric grade in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Grade(u8);

impl Grade {
    pub const MIN: Grade = Grade(0);
    pub const MAX: Grade = Grade(100);

    /// Returns `None` if `value` is outside `0..=100`.
    pub fn new(value: i64) -> Option<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN.0..=Self::MAX.0).contains(v))
            .map(Self)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Grade Tracking
// ============================================================================

/// Grade state of a single enrollment.
///
/// An enrollment starts `Pending` and moves to `Assigned` once graded.
/// Reassignment overwrites the value; there is no way back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GradeState {
    #[default]
    Pending,
    Assigned(Grade),
}

impl GradeState {
    pub fn is_assigned(&self) -> bool {
        matches!(self, GradeState::Assigned(_))
    }

    pub fn grade(&self) -> Option<Grade> {
        match self {
            GradeState::Pending => None,
            GradeState::Assigned(grade) => Some(*grade),
        }
    }
}

impl Display for GradeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeState::Pending => write!(f, "pending"),
            GradeState::Assigned(grade) => write!(f, "{grade}"),
        }
    }
}

/// Per-student aggregate grade: the mean of all assigned grades.
///
/// Stored as a running total and count so the value stays exact and
/// comparable; [`Aggregate::mean`] does the division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggregate {
    /// The student has no assigned grades yet.
    NoGrades,
    /// Sum and number of assigned grades (`count` is never zero).
    Graded { total: u32, count: u32 },
}

impl Aggregate {
    /// Folds grade states into an aggregate, skipping pending ones.
    pub fn from_states<'a>(states: impl IntoIterator<Item = &'a GradeState>) -> Self {
        let (total, count) = states
            .into_iter()
            .filter_map(GradeState::grade)
            .fold((0u32, 0u32), |(total, count), grade| {
                (total + u32::from(grade.as_u8()), count + 1)
            });

        if count == 0 {
            Aggregate::NoGrades
        } else {
            Aggregate::Graded { total, count }
        }
    }

    /// Returns the arithmetic mean, or `None` when nothing is graded.
    pub fn mean(&self) -> Option<f64> {
        match self {
            Aggregate::NoGrades => None,
            Aggregate::Graded { total, count } => Some(f64::from(*total) / f64::from(*count)),
        }
    }
}

impl Display for Aggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mean() {
            None => write!(f, "no grades yet"),
            Some(mean) => write!(f, "{mean:.2}"),
        }
    }
}

// ============================================================================
// Audit Actions
// ============================================================================

/// A successful administrative mutation, recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    CourseAdded {
        course_id: CourseId,
        name: String,
        capacity: Capacity,
    },
    CourseUpdated {
        course_id: CourseId,
        name: String,
        capacity: Capacity,
    },
    StudentAdded {
        student_id: StudentId,
        name: String,
    },
    StudentUpdated {
        student_id: StudentId,
        name: String,
    },
    StudentEnrolled {
        student_id: StudentId,
        course_id: CourseId,
    },
    GradeAssigned {
        student_id: StudentId,
        course_id: CourseId,
        previous: GradeState,
        grade: Grade,
    },
    AggregateComputed {
        student_id: StudentId,
        aggregate: Aggregate,
    },
}

impl Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::CourseAdded {
                course_id,
                name,
                capacity,
            } => write!(f, "course {course_id} added ('{name}', capacity {capacity})"),
            AuditAction::CourseUpdated {
                course_id,
                name,
                capacity,
            } => write!(
                f,
                "course {course_id} updated ('{name}', capacity {capacity})"
            ),
            AuditAction::StudentAdded { student_id, name } => {
                write!(f, "student {student_id} added ('{name}')")
            }
            AuditAction::StudentUpdated { student_id, name } => {
                write!(f, "student {student_id} renamed to '{name}'")
            }
            AuditAction::StudentEnrolled {
                student_id,
                course_id,
            } => write!(f, "student {student_id} enrolled in {course_id}"),
            AuditAction::GradeAssigned {
                student_id,
                course_id,
                previous,
                grade,
            } => write!(
                f,
                "grade for {student_id} in {course_id}: {previous} -> {grade}"
            ),
            AuditAction::AggregateComputed {
                student_id,
                aggregate,
            } => write!(f, "aggregate for {student_id} computed: {aggregate}"),
        }
    }
}

#[cfg(test)]
mod tests;

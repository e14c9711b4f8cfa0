//! # Roster
//!
//! Course enrollment and grade management core.
//!
//! Roster keeps courses, students, enrollments and grades consistent while
//! they are mutated through a small administrative surface:
//!
//! - **Enroll once** - a student/course pair exists at most once
//! - **Per-course capacity** - a course never holds more students than seats
//! - **Grades only for enrollments** - grades are `0..=100` and need an enrollment
//! - **Audit trail** - every successful mutation is recorded
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                          Roster                          │
//! │  ┌───────────┐   ┌────────────┐   ┌───────────────────┐  │
//! │  │ Operation │ → │   Kernel   │ → │ Effects (audit,   │  │
//! │  │ (facade)  │   │ (pure FSM) │   │  records, cache)  │  │
//! │  └───────────┘   └────────────┘   └───────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use roster::Roster;
//!
//! let roster = Roster::new();
//! roster.add_course("CS101", "Intro", 2)?;
//! let alice = roster.add_student("Alice")?;
//!
//! roster.enroll(&alice.to_string(), "CS101")?;
//! roster.assign_grade(&alice.to_string(), "CS101", 91)?;
//!
//! let aggregate = roster.compute_aggregate(&alice.to_string())?;
//! assert_eq!(aggregate.mean(), Some(91.0));
//! # Ok::<(), roster::RosterError>(())
//! ```

mod error;
mod operation;
mod roster;
mod view;

pub use error::{Result, RosterError};
pub use operation::{Operation, Outcome, tokenize};
pub use roster::{AuditEntry, Roster};
pub use view::{CourseView, EnrollmentView, StudentView};

// Re-export core types
pub use roster_types::{
    Aggregate, AuditAction, Capacity, CourseId, Grade, GradeState, ParseStudentIdError, StudentId,
};

// Re-export kernel types
pub use roster_kernel::{Command, Effect, ErrorKind, KernelError, State, apply_committed};

//! Effects produced by the kernel.
//!
//! Effects represent side effects that the shell must execute after a
//! command is applied. They also carry the results a caller needs, such as
//! the freshly allocated student record or a computed aggregate.

use roster_types::{Aggregate, AuditAction, StudentId};
use serde::{Deserialize, Serialize};

use crate::state::{Course, Student};

/// An effect to be executed by the shell.
///
/// Produced by [`super::kernel::apply_committed`]. Every successful command
/// yields at least one record effect and exactly one audit effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// A course record was created or changed.
    CourseWrite(Course),

    /// A student record was created or changed.
    StudentWrite(Student),

    /// A student's aggregate grade was recomputed and cached.
    AggregateComputed {
        student_id: StudentId,
        aggregate: Aggregate,
    },

    /// Append an entry to the audit log.
    AuditLogAppend(AuditAction),
}

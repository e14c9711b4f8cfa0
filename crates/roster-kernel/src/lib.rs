//! # roster-kernel: Functional core of `Roster`
//!
//! The kernel is the pure, deterministic heart of the system. It receives
//! administrative commands and produces state changes plus effects for the
//! shell to execute.
//!
//! ## Key Principles
//!
//! - **No IO**: The kernel never touches disk, terminal, or clocks
//! - **No randomness**: Student IDs come from a counter in [`State`]
//! - **Pure functions**: `apply_committed(state, command) -> (state, effects)`
//! - **All or nothing**: A rejected command returns an error and no state
//!
//! ## Architecture
//!
//! - [`command`]: Commands that can be submitted (`AddCourse`, `Enroll`, ...)
//! - [`effects`]: Effects for the shell to execute (`StudentWrite`, `AuditLogAppend`)
//! - [`state`]: The entity store holding courses, students and cached aggregates
//! - [`enrollment`]: Enroll-once, capacity-checked student/course relation
//! - [`grading`]: Grade assignment and per-student aggregates
//! - [`kernel`]: The `apply_committed` function that ties it all together
//!
//! ## Example
//!
//! ```
//! use roster_kernel::{Command, State, apply_committed};
//!
//! let state = State::new();
//! let (state, _effects) =
//!     apply_committed(state, Command::add_course("CS101", "Intro", 2)).unwrap();
//!
//! assert!(state.course_exists(&"CS101".into()));
//! ```

pub mod command;
pub mod effects;
pub mod enrollment;
pub mod grading;
pub mod kernel;
pub mod state;


// Re-export commonly used items
pub use command::Command;
pub use effects::Effect;
pub use kernel::{ErrorKind, KernelError, apply_committed, apply_committed_batch};
pub use state::{Course, State, Student};

//! Roster error types.

use roster_kernel::{ErrorKind, KernelError};
use thiserror::Error;

/// Result type for roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;

/// Errors returned by the administrative facade.
///
/// Every variant is recoverable: callers report it and carry on.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The kernel rejected the command.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// A student ID string could not be parsed, so no such student exists.
    #[error("student {0} not found")]
    UnknownStudentId(String),

    /// The operation name is not one of the supported operations.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// Arguments for a named operation were missing or malformed.
    #[error("invalid arguments for {operation}: {reason}")]
    InvalidArguments {
        operation: &'static str,
        reason: String,
    },

    /// Internal failure (lock poisoned).
    #[error("internal error: {0}")]
    Internal(String),
}

impl RosterError {
    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        RosterError::Internal(msg.into())
    }

    pub(crate) fn invalid_arguments(operation: &'static str, reason: impl Into<String>) -> Self {
        RosterError::InvalidArguments {
            operation,
            reason: reason.into(),
        }
    }

    /// Maps the error into the kernel's failure taxonomy, where it fits.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            RosterError::Kernel(e) => Some(e.kind()),
            RosterError::UnknownStudentId(_) => Some(ErrorKind::NotFound),
            RosterError::InvalidArguments { .. } => Some(ErrorKind::InvalidArgument),
            RosterError::UnknownOperation(_) | RosterError::Internal(_) => None,
        }
    }

    /// Short user-facing message, prefixed with the failure category.
    pub fn user_message(&self) -> String {
        match self.kind() {
            Some(kind) => format!("{kind}: {self}"),
            None => self.to_string(),
        }
    }
}

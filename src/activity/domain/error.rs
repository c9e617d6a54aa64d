//! Error types for activity domain invariants.

use thiserror::Error;

/// Violations of activity aggregate invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityDomainError {
    /// Activity names must be non-empty after trimming.
    #[error("activity name must not be empty")]
    EmptyActivityName,
    /// Message content must be non-empty after trimming.
    #[error("message content must not be empty")]
    EmptyMessage,
    /// System messages cannot be edited or deleted by users.
    #[error("system messages cannot be modified")]
    SystemMessageImmutable,
}

/// Raised when a string is not a recognised activity kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown activity kind: {0}")]
pub struct ParseActivityKindError(pub String);

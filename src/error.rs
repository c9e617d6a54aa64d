//! Cross-cutting error taxonomy surfaced to transport layers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a governance failure.
///
/// Every service error maps onto exactly one kind so that any transport
/// (HTTP, RPC) can render a consistent user-facing response without
/// inspecting individual variants. The engine never retries on its own;
/// retry policy belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced user, team, activity, task, or request is absent.
    NotFound,
    /// The acting user lacks the required role or tier.
    Forbidden,
    /// The payload is malformed: bad enum value, empty reason, unsupported
    /// or oversized attachment.
    InvalidArgument,
    /// A uniqueness rule was violated: duplicate membership, duplicate
    /// pending request, username collision.
    Conflict,
    /// The operation is not legal for the entity's current state.
    InvalidState,
    /// The requested state transition is not permitted.
    InvalidTransition,
    /// The backing store failed.
    Internal,
}

impl ErrorKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::InvalidArgument => "invalid_argument",
            Self::Conflict => "conflict",
            Self::InvalidState => "invalid_state",
            Self::InvalidTransition => "invalid_transition",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

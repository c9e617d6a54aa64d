//! Error types for team domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating team domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamDomainError {
    /// The team name is empty after trimming.
    #[error("team name must not be empty")]
    EmptyTeamName,

    /// The invitation has already been accepted or declined.
    #[error("invitation has already been handled")]
    InvitationAlreadyHandled,
}

/// Error returned while parsing a team role from its wire form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown team role: {0}")]
pub struct ParseTeamRoleError(pub String);

/// Error returned while parsing a team status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown team status: {0}")]
pub struct ParseTeamStatusError(pub String);

//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username exceeds the storage limit.
    #[error("username '{0}' exceeds the maximum length")]
    UsernameTooLong(String),
}

/// Error returned while parsing a global role from its wire form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown global role: {0}")]
pub struct ParseGlobalRoleError(pub String);

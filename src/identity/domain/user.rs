//! User account record as supplied by the identity provider.

use super::{GlobalRole, IdentityDomainError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated unique username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Largest username accepted by the directory.
    pub const MAX_LEN: usize = 50;

    /// Creates a validated username.
    ///
    /// The value is trimmed; uniqueness is enforced by the user repository.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyUsername`] when the trimmed value
    /// is empty and [`IdentityDomainError::UsernameTooLong`] when it exceeds
    /// [`Self::MAX_LEN`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(IdentityDomainError::EmptyUsername);
        }
        if normalized.chars().count() > Self::MAX_LEN {
            return Err(IdentityDomainError::UsernameTooLong(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated user record.
///
/// Credentials never reach the engine; the identity provider hands over an
/// already-verified record for every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    global_role: GlobalRole,
}

impl User {
    /// Creates a user record with a fresh identifier.
    #[must_use]
    pub fn new(username: Username, global_role: GlobalRole) -> Self {
        Self {
            id: UserId::new(),
            username,
            global_role,
        }
    }

    /// Reconstructs a user record from persisted parts.
    #[must_use]
    pub const fn from_parts(id: UserId, username: Username, global_role: GlobalRole) -> Self {
        Self {
            id,
            username,
            global_role,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the global role.
    #[must_use]
    pub const fn global_role(&self) -> GlobalRole {
        self.global_role
    }

    /// Replaces the global role. Identity is immutable; the role is not.
    pub const fn set_global_role(&mut self, role: GlobalRole) {
        self.global_role = role;
    }
}

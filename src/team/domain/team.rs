//! Team aggregate root.

use super::{ParseTeamStatusError, TeamDomainError, TeamId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Approval state of a team.
///
/// New teams start pending unless created by a global administrator; pending
/// teams are hidden from task visibility until approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    /// Awaiting approval by a global administrator.
    Pending,
    /// Approved and fully visible.
    Approved,
}

impl TeamStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TeamStatus {
    type Error = ParseTeamStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            _ => Err(ParseTeamStatusError(value.to_owned())),
        }
    }
}

/// Validated team name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(String);

impl TeamName {
    /// Creates a validated team name.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::EmptyTeamName`] when the trimmed value is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, TeamDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TeamDomainError::EmptyTeamName);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Team aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: TeamName,
    status: TeamStatus,
    only_admins_assign: bool,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new team.
    ///
    /// The status starts [`TeamStatus::Approved`] only when the creator is a
    /// global administrator, otherwise [`TeamStatus::Pending`].
    #[must_use]
    pub fn new(
        name: TeamName,
        created_by: UserId,
        creator_is_global_admin: bool,
        clock: &impl Clock,
    ) -> Self {
        let status = if creator_is_global_admin {
            TeamStatus::Approved
        } else {
            TeamStatus::Pending
        };
        Self {
            id: TeamId::new(),
            name,
            status,
            only_admins_assign: false,
            created_by,
            created_at: clock.utc(),
        }
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the team name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }

    /// Returns the approval status.
    #[must_use]
    pub const fn status(&self) -> TeamStatus {
        self.status
    }

    /// Returns true when the team has been approved.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self.status, TeamStatus::Approved)
    }

    /// Returns true when only team admins may assign tasks to others.
    #[must_use]
    pub const fn only_admins_assign(&self) -> bool {
        self.only_admins_assign
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the team approved. Idempotent.
    pub const fn approve(&mut self) {
        self.status = TeamStatus::Approved;
    }

    /// Restricts task assignment to team admins.
    pub const fn set_only_admins_assign(&mut self, restricted: bool) {
        self.only_admins_assign = restricted;
    }
}

//! Application-wide role stored on the user account.

use super::ParseGlobalRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global role of a user, application-wide.
///
/// Distinct from the team-scoped role on a membership: the same enumeration
/// of tiers exists in both axes but they are resolved independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalRole {
    /// Full administrative access across every team.
    Admin,
    /// Division-level administrator, equivalent to [`Self::Admin`] for
    /// authorisation purposes.
    #[serde(rename = "division head")]
    DivisionHead,
    /// Directs projects; privileged within any team.
    #[serde(rename = "project director")]
    ProjectDirector,
    /// Heads a group; privileged within any team.
    #[serde(rename = "group head")]
    GroupHead,
    /// Leads a team; privileged within any team.
    #[serde(rename = "team lead")]
    TeamLead,
    /// Ordinary account with no standing privileges.
    Member,
}

impl GlobalRole {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::DivisionHead => "division head",
            Self::ProjectDirector => "project director",
            Self::GroupHead => "group head",
            Self::TeamLead => "team lead",
            Self::Member => "member",
        }
    }

    /// Returns true for the tiers treated as global administrators.
    ///
    /// Global administrators bypass every team-scoped membership check.
    #[must_use]
    pub const fn is_global_admin(self) -> bool {
        matches!(self, Self::Admin | Self::DivisionHead)
    }
}

impl fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GlobalRole {
    type Error = ParseGlobalRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "division head" => Ok(Self::DivisionHead),
            "project director" => Ok(Self::ProjectDirector),
            "group head" => Ok(Self::GroupHead),
            "team lead" => Ok(Self::TeamLead),
            "member" => Ok(Self::Member),
            _ => Err(ParseGlobalRoleError(value.to_owned())),
        }
    }
}

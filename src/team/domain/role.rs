//! Team-scoped role stored on a membership.

use super::ParseTeamRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user within one team.
///
/// Semantically distinct from [`crate::identity::domain::GlobalRole`]: the
/// wire forms are capitalised and "Admin" exists only on this axis. A team
/// Admin administers one team; they hold no application-wide authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamRole {
    /// Administers this team: decides requests, removes members, deletes
    /// tasks and activities.
    Admin,
    /// Ordinary team member.
    Member,
    /// Division Head within this team.
    #[serde(rename = "Division Head")]
    DivisionHead,
    /// Project Director within this team; privileged.
    #[serde(rename = "Project Director")]
    ProjectDirector,
    /// Group Head within this team; privileged.
    #[serde(rename = "Group Head")]
    GroupHead,
    /// Team Lead within this team; privileged.
    #[serde(rename = "Team Lead")]
    TeamLead,
}

impl TeamRole {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Member => "Member",
            Self::DivisionHead => "Division Head",
            Self::ProjectDirector => "Project Director",
            Self::GroupHead => "Group Head",
            Self::TeamLead => "Team Lead",
        }
    }

    /// Returns true for the team-scoped tiers that confer in-team privilege.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::ProjectDirector | Self::GroupHead | Self::TeamLead)
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TeamRole {
    type Error = ParseTeamRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "division head" => Ok(Self::DivisionHead),
            "project director" => Ok(Self::ProjectDirector),
            "group head" => Ok(Self::GroupHead),
            "team lead" => Ok(Self::TeamLead),
            _ => Err(ParseTeamRoleError(value.to_owned())),
        }
    }
}

//! Membership of a user in a team.

use super::{TeamId, TeamRole};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A (user, team) membership pair carrying the team-scoped role.
///
/// Memberships are unique per pair; the repository enforces the uniqueness
/// and preserves join order, which defines "first team admin" for default
/// extension approvers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    user_id: UserId,
    team_id: TeamId,
    role: TeamRole,
    joined_at: DateTime<Utc>,
}

impl TeamMembership {
    /// Creates a new membership.
    #[must_use]
    pub fn new(user_id: UserId, team_id: TeamId, role: TeamRole, clock: &impl Clock) -> Self {
        Self {
            user_id,
            team_id,
            role,
            joined_at: clock.utc(),
        }
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the team-scoped role.
    #[must_use]
    pub const fn role(&self) -> TeamRole {
        self.role
    }

    /// Returns the join timestamp.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    /// Returns true when this membership carries the team Admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, TeamRole::Admin)
    }
}

//! Team invitations: invite instead of direct add.

use super::{InvitationId, TeamDomainError, TeamId, TeamRole};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Issued and awaiting the invitee's decision.
    Pending,
    /// Accepted; a membership has been created.
    Accepted,
    /// Declined by the invitee.
    Declined,
}

impl InvitationStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invitation for a user to join a team with a given role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInvitation {
    id: InvitationId,
    team_id: TeamId,
    user_id: UserId,
    invited_by: UserId,
    role: TeamRole,
    status: InvitationStatus,
    created_at: DateTime<Utc>,
}

impl TeamInvitation {
    /// Creates a pending invitation.
    #[must_use]
    pub fn new(
        team_id: TeamId,
        user_id: UserId,
        invited_by: UserId,
        role: TeamRole,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: InvitationId::new(),
            team_id,
            user_id,
            invited_by,
            role,
            status: InvitationStatus::Pending,
            created_at: clock.utc(),
        }
    }

    /// Returns the invitation identifier.
    #[must_use]
    pub const fn id(&self) -> InvitationId {
        self.id
    }

    /// Returns the target team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the invited user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the issuing user.
    #[must_use]
    pub const fn invited_by(&self) -> UserId {
        self.invited_by
    }

    /// Returns the role the invitee would join with.
    #[must_use]
    pub const fn role(&self) -> TeamRole {
        self.role
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> InvitationStatus {
        self.status
    }

    /// Returns the issue timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the invitation accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::InvitationAlreadyHandled`] unless the
    /// invitation is still pending.
    pub const fn accept(&mut self) -> Result<(), TeamDomainError> {
        self.transition(InvitationStatus::Accepted)
    }

    /// Marks the invitation declined.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::InvitationAlreadyHandled`] unless the
    /// invitation is still pending.
    pub const fn decline(&mut self) -> Result<(), TeamDomainError> {
        self.transition(InvitationStatus::Declined)
    }

    const fn transition(&mut self, target: InvitationStatus) -> Result<(), TeamDomainError> {
        if !matches!(self.status, InvitationStatus::Pending) {
            return Err(TeamDomainError::InvitationAlreadyHandled);
        }
        self.status = target;
        Ok(())
    }
}

//! Repository port for team, membership, and invitation persistence.

use crate::identity::domain::UserId;
use crate::team::domain::{
    InvitationId, Team, TeamId, TeamInvitation, TeamMembership, TeamStatus,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for team repository operations.
pub type TeamRepositoryResult<T> = Result<T, TeamRepositoryError>;

/// Team persistence contract.
///
/// Memberships are owned by the team aggregate: the repository enforces
/// (user, team) uniqueness and returns members in join order, which the
/// extension workflow relies on to pick the default approver.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Stores a new team.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::DuplicateTeam`] when the identifier
    /// already exists.
    async fn store_team(&self, team: &Team) -> TeamRepositoryResult<()>;

    /// Persists changes to an existing team (status, assignment policy).
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::TeamNotFound`] when absent.
    async fn update_team(&self, team: &Team) -> TeamRepositoryResult<()>;

    /// Finds a team by identifier. Returns `None` when absent.
    async fn find_team(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>>;

    /// Returns teams filtered by status, or all teams when `None`.
    async fn list_teams(&self, status: Option<TeamStatus>) -> TeamRepositoryResult<Vec<Team>>;

    /// Deletes a team row. The caller is responsible for cascade checks.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::TeamNotFound`] when absent.
    async fn delete_team(&self, id: TeamId) -> TeamRepositoryResult<()>;

    /// Adds a membership.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::DuplicateMembership`] when the pair
    /// already exists.
    async fn add_member(&self, membership: &TeamMembership) -> TeamRepositoryResult<()>;

    /// Removes a membership.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::MembershipNotFound`] when the pair
    /// does not exist.
    async fn remove_member(&self, user_id: UserId, team_id: TeamId) -> TeamRepositoryResult<()>;

    /// Finds the membership for a (user, team) pair. Returns `None` when the
    /// user is not a member.
    async fn membership(
        &self,
        user_id: UserId,
        team_id: TeamId,
    ) -> TeamRepositoryResult<Option<TeamMembership>>;

    /// Returns every membership of a team in join order.
    async fn members_of(&self, team_id: TeamId) -> TeamRepositoryResult<Vec<TeamMembership>>;

    /// Returns every team the user belongs to, paired with the membership.
    async fn teams_for_user(
        &self,
        user_id: UserId,
    ) -> TeamRepositoryResult<Vec<(Team, TeamMembership)>>;

    /// Stores a new invitation.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::DuplicatePendingInvitation`] when a
    /// pending invitation for the same (team, user) pair already exists.
    async fn store_invitation(&self, invitation: &TeamInvitation) -> TeamRepositoryResult<()>;

    /// Persists a decided invitation.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::InvitationNotFound`] when absent.
    async fn update_invitation(&self, invitation: &TeamInvitation) -> TeamRepositoryResult<()>;

    /// Finds an invitation by identifier. Returns `None` when absent.
    async fn find_invitation(
        &self,
        id: InvitationId,
    ) -> TeamRepositoryResult<Option<TeamInvitation>>;

    /// Returns pending invitations addressed to a user.
    async fn pending_invitations_for(
        &self,
        user_id: UserId,
    ) -> TeamRepositoryResult<Vec<TeamInvitation>>;
}

/// Errors returned by team repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TeamRepositoryError {
    /// A team with the same identifier already exists.
    #[error("duplicate team identifier: {0}")]
    DuplicateTeam(TeamId),

    /// The team was not found.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// The (user, team) membership already exists.
    #[error("user {user_id} is already a member of team {team_id}")]
    DuplicateMembership {
        /// Member user identifier.
        user_id: UserId,
        /// Team identifier.
        team_id: TeamId,
    },

    /// The (user, team) membership does not exist.
    #[error("user {user_id} is not a member of team {team_id}")]
    MembershipNotFound {
        /// Member user identifier.
        user_id: UserId,
        /// Team identifier.
        team_id: TeamId,
    },

    /// A pending invitation for the pair already exists.
    #[error("a pending invitation for user {user_id} to team {team_id} already exists")]
    DuplicatePendingInvitation {
        /// Invited user identifier.
        user_id: UserId,
        /// Team identifier.
        team_id: TeamId,
    },

    /// The invitation was not found.
    #[error("invitation not found: {0}")]
    InvitationNotFound(InvitationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TeamRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

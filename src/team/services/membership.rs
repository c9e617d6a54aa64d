//! Team membership management: creation, approval, invitations, and
//! member add/remove with its unassignment cascade.

use crate::activity::domain::{ActivityMessage, AuditEntry};
use crate::activity::ports::{
    ActivityRepository, ActivityRepositoryError, AuditTrail, MessageRepository, NotificationSink,
    emit_audit, emit_notice,
};
use crate::error::ErrorKind;
use crate::identity::domain::{User, UserId};
use crate::identity::ports::{UserRepository, UserRepositoryError};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use crate::team::domain::{
    EffectiveRole, InvitationId, Team, TeamDomainError, TeamId, TeamInvitation, TeamMembership,
    TeamName, TeamRole, TeamStatus,
};
use crate::team::ports::{TeamRepository, TeamRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`TeamService`] operations.
#[derive(Debug, Error)]
pub enum TeamServiceError {
    /// A domain invariant was violated.
    #[error(transparent)]
    Domain(#[from] TeamDomainError),
    /// The team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),
    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    /// The invitation does not exist.
    #[error("invitation not found: {0}")]
    InvitationNotFound(InvitationId),
    /// The caller must be a global admin.
    #[error("only global admins may perform this action")]
    GlobalAdminRequired,
    /// The caller must be a team admin or global admin.
    #[error("only team admins may perform this action")]
    TeamAdminRequired,
    /// The caller's tier does not permit removing members.
    #[error("caller may not remove members from this team")]
    RemovalNotPermitted,
    /// The user already belongs to the team.
    #[error("user {user_id} is already a member of team {team_id}")]
    AlreadyMember {
        /// User holding the membership.
        user_id: UserId,
        /// Team concerned.
        team_id: TeamId,
    },
    /// The user does not belong to the team.
    #[error("user {user_id} is not a member of team {team_id}")]
    NotAMember {
        /// User lacking the membership.
        user_id: UserId,
        /// Team concerned.
        team_id: TeamId,
    },
    /// The user already has a pending invitation to the team.
    #[error("user {user_id} already has a pending invitation to team {team_id}")]
    InvitationAlreadyPending {
        /// Invited user.
        user_id: UserId,
        /// Team concerned.
        team_id: TeamId,
    },
    /// The invitation is addressed to a different user.
    #[error("invitation {0} is addressed to another user")]
    InvitationForAnotherUser(InvitationId),
    /// Removing the last team admin would orphan the team.
    #[error("team {0} would be left without an admin")]
    LastTeamAdmin(TeamId),
    /// The team still owns members, activities, or tasks.
    #[error("team {0} is not empty")]
    TeamNotEmpty(TeamId),
    /// Team persistence failed.
    #[error(transparent)]
    Teams(TeamRepositoryError),
    /// User persistence failed.
    #[error(transparent)]
    Users(UserRepositoryError),
    /// Task persistence failed during the unassignment cascade.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Activity persistence failed while posting system messages.
    #[error(transparent)]
    Activities(#[from] ActivityRepositoryError),
}

impl TeamServiceError {
    /// Classifies the error for transport layers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::InvalidArgument,
            Self::TeamNotFound(_)
            | Self::UserNotFound(_)
            | Self::InvitationNotFound(_)
            | Self::NotAMember { .. } => ErrorKind::NotFound,
            Self::GlobalAdminRequired
            | Self::TeamAdminRequired
            | Self::RemovalNotPermitted
            | Self::InvitationForAnotherUser(_) => ErrorKind::Forbidden,
            Self::AlreadyMember { .. } | Self::InvitationAlreadyPending { .. } => {
                ErrorKind::Conflict
            }
            Self::LastTeamAdmin(_) | Self::TeamNotEmpty(_) => ErrorKind::InvalidState,
            Self::Teams(_) | Self::Users(_) | Self::Tasks(_) | Self::Activities(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<TeamRepositoryError> for TeamServiceError {
    fn from(err: TeamRepositoryError) -> Self {
        match err {
            TeamRepositoryError::TeamNotFound(id) => Self::TeamNotFound(id),
            TeamRepositoryError::DuplicateMembership { user_id, team_id } => {
                Self::AlreadyMember { user_id, team_id }
            }
            TeamRepositoryError::MembershipNotFound { user_id, team_id } => {
                Self::NotAMember { user_id, team_id }
            }
            TeamRepositoryError::DuplicatePendingInvitation { user_id, team_id } => {
                Self::InvitationAlreadyPending { user_id, team_id }
            }
            TeamRepositoryError::InvitationNotFound(id) => Self::InvitationNotFound(id),
            other => Self::Teams(other),
        }
    }
}

impl From<UserRepositoryError> for TeamServiceError {
    fn from(err: UserRepositoryError) -> Self {
        Self::Users(err)
    }
}

/// Service coordinating teams, memberships, and invitations.
#[derive(Debug)]
pub struct TeamService<R, U, T, A, E, C> {
    teams: Arc<R>,
    users: Arc<U>,
    tasks: Arc<T>,
    activities: Arc<A>,
    events: Arc<E>,
    clock: Arc<C>,
}

impl<R, U, T, A, E, C> TeamService<R, U, T, A, E, C>
where
    R: TeamRepository,
    U: UserRepository,
    T: TaskRepository,
    A: ActivityRepository + MessageRepository,
    E: AuditTrail + NotificationSink,
    C: Clock,
{
    /// Creates a service over the given collaborators.
    #[must_use]
    pub const fn new(
        teams: Arc<R>,
        users: Arc<U>,
        tasks: Arc<T>,
        activities: Arc<A>,
        events: Arc<E>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            teams,
            users,
            tasks,
            activities,
            events,
            clock,
        }
    }

    /// Creates a team. The team starts pending unless the creator is a
    /// global admin; the creator becomes the first team admin either way.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Teams`] on persistence failure.
    pub async fn create_team(
        &self,
        creator: &User,
        name: TeamName,
        only_admins_assign: bool,
    ) -> Result<Team, TeamServiceError> {
        let mut team = Team::new(
            name,
            creator.id(),
            creator.global_role().is_global_admin(),
            self.clock.as_ref(),
        );
        team.set_only_admins_assign(only_admins_assign);
        self.teams.store_team(&team).await?;
        let membership = TeamMembership::new(
            creator.id(),
            team.id(),
            TeamRole::Admin,
            self.clock.as_ref(),
        );
        self.teams.add_member(&membership).await?;
        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                creator.id(),
                "team.create",
                format!("created team '{}'", team.name()),
                self.clock.as_ref(),
            ),
        )
        .await;
        Ok(team)
    }

    /// Approves a pending team. Re-approving is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::GlobalAdminRequired`] for callers
    /// below the global-admin tier and [`TeamServiceError::TeamNotFound`]
    /// for unknown teams.
    pub async fn approve_team(
        &self,
        actor: &User,
        team_id: TeamId,
    ) -> Result<Team, TeamServiceError> {
        if !actor.global_role().is_global_admin() {
            return Err(TeamServiceError::GlobalAdminRequired);
        }
        let mut team = self.require_team(team_id).await?;
        if team.is_approved() {
            return Ok(team);
        }
        team.approve();
        self.teams.update_team(&team).await?;
        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                actor.id(),
                "team.approve",
                format!("approved team '{}'", team.name()),
                self.clock.as_ref(),
            ),
        )
        .await;
        emit_notice(
            self.events.as_ref(),
            [team.created_by()],
            &format!("Your team '{}' has been approved", team.name()),
        )
        .await;
        Ok(team)
    }

    /// Lists approved teams.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Teams`] on persistence failure.
    pub async fn list_teams(&self) -> Result<Vec<Team>, TeamServiceError> {
        Ok(self.teams.list_teams(Some(TeamStatus::Approved)).await?)
    }

    /// Lists teams awaiting approval. Global admins only.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::GlobalAdminRequired`] for callers
    /// below the global-admin tier.
    pub async fn pending_teams(&self, actor: &User) -> Result<Vec<Team>, TeamServiceError> {
        if !actor.global_role().is_global_admin() {
            return Err(TeamServiceError::GlobalAdminRequired);
        }
        Ok(self.teams.list_teams(Some(TeamStatus::Pending)).await?)
    }

    /// Returns the teams a user can see, paired with their role in each.
    /// Global admins see every approved team as its admin.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Teams`] on persistence failure.
    pub async fn teams_for_user(
        &self,
        user: &User,
    ) -> Result<Vec<(Team, TeamRole)>, TeamServiceError> {
        if user.global_role().is_global_admin() {
            let teams = self.teams.list_teams(Some(TeamStatus::Approved)).await?;
            return Ok(teams.into_iter().map(|t| (t, TeamRole::Admin)).collect());
        }
        let memberships = self.teams.teams_for_user(user.id()).await?;
        Ok(memberships
            .into_iter()
            .map(|(team, membership)| (team, membership.role()))
            .collect())
    }

    /// Invites a user to a team. Team admins and global admins only.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::TeamAdminRequired`] for unauthorized
    /// callers, [`TeamServiceError::AlreadyMember`] when the invitee
    /// already belongs, and [`TeamServiceError::InvitationAlreadyPending`]
    /// when a pending invitation exists.
    pub async fn invite(
        &self,
        actor: &User,
        team_id: TeamId,
        invitee: UserId,
        role: TeamRole,
    ) -> Result<TeamInvitation, TeamServiceError> {
        let (team, effective) = self.effective(actor, team_id).await?;
        if !effective.is_admin() {
            return Err(TeamServiceError::TeamAdminRequired);
        }
        self.require_user(invitee).await?;
        if self.teams.membership(invitee, team_id).await?.is_some() {
            return Err(TeamServiceError::AlreadyMember {
                user_id: invitee,
                team_id,
            });
        }
        let invitation =
            TeamInvitation::new(team_id, invitee, actor.id(), role, self.clock.as_ref());
        self.teams.store_invitation(&invitation).await?;
        emit_notice(
            self.events.as_ref(),
            [invitee],
            &format!("You have been invited to join team '{}'", team.name()),
        )
        .await;
        Ok(invitation)
    }

    /// Accepts or declines an invitation addressed to the caller.
    /// Acceptance re-validates that the caller has not joined in the
    /// meantime before converting the invitation into a membership.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::InvitationForAnotherUser`] when the
    /// caller is not the invitee and [`TeamServiceError::Domain`] when
    /// the invitation was already handled.
    pub async fn respond_to_invitation(
        &self,
        actor: &User,
        invitation_id: InvitationId,
        accept: bool,
    ) -> Result<TeamInvitation, TeamServiceError> {
        let Some(mut invitation) = self.teams.find_invitation(invitation_id).await? else {
            return Err(TeamServiceError::InvitationNotFound(invitation_id));
        };
        if invitation.user_id() != actor.id() {
            return Err(TeamServiceError::InvitationForAnotherUser(invitation_id));
        }
        if accept {
            if self
                .teams
                .membership(actor.id(), invitation.team_id())
                .await?
                .is_some()
            {
                return Err(TeamServiceError::AlreadyMember {
                    user_id: actor.id(),
                    team_id: invitation.team_id(),
                });
            }
            invitation.accept()?;
            let membership = TeamMembership::new(
                actor.id(),
                invitation.team_id(),
                invitation.role(),
                self.clock.as_ref(),
            );
            self.teams.add_member(&membership).await?;
        } else {
            invitation.decline()?;
        }
        self.teams.update_invitation(&invitation).await?;
        emit_notice(
            self.events.as_ref(),
            [invitation.invited_by()],
            &format!(
                "{} has {} your team invitation",
                actor.username(),
                if accept { "accepted" } else { "declined" }
            ),
        )
        .await;
        Ok(invitation)
    }

    /// Lists pending invitations addressed to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Teams`] on persistence failure.
    pub async fn pending_invitations(
        &self,
        actor: &User,
    ) -> Result<Vec<TeamInvitation>, TeamServiceError> {
        Ok(self.teams.pending_invitations_for(actor.id()).await?)
    }

    /// Adds a member directly. Team admins and global admins only.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::TeamAdminRequired`] for unauthorized
    /// callers and [`TeamServiceError::AlreadyMember`] for existing
    /// members.
    pub async fn add_member(
        &self,
        actor: &User,
        team_id: TeamId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<TeamMembership, TeamServiceError> {
        let (team, effective) = self.effective(actor, team_id).await?;
        if !effective.is_admin() {
            return Err(TeamServiceError::TeamAdminRequired);
        }
        self.require_user(user_id).await?;
        let membership = TeamMembership::new(user_id, team_id, role, self.clock.as_ref());
        self.teams.add_member(&membership).await?;
        emit_notice(
            self.events.as_ref(),
            [user_id],
            &format!("You have been added to team '{}'", team.name()),
        )
        .await;
        Ok(membership)
    }

    /// Removes a member. Permitted for global admins, team admins, and
    /// privileged team roles. Removing the last team admin is refused,
    /// and every task in the team still assigned to the removed user is
    /// unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::RemovalNotPermitted`] for callers
    /// below the required tier, [`TeamServiceError::NotAMember`] when the
    /// target does not belong, and [`TeamServiceError::LastTeamAdmin`]
    /// when removal would orphan the team.
    pub async fn remove_member(
        &self,
        actor: &User,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<(), TeamServiceError> {
        let (team, effective) = self.effective(actor, team_id).await?;
        if !effective.can_remove_members() {
            return Err(TeamServiceError::RemovalNotPermitted);
        }
        let Some(target) = self.teams.membership(user_id, team_id).await? else {
            return Err(TeamServiceError::NotAMember { user_id, team_id });
        };
        if target.is_admin() {
            let members = self.teams.members_of(team_id).await?;
            let admins = members.iter().filter(|m| m.is_admin()).count();
            if admins <= 1 {
                return Err(TeamServiceError::LastTeamAdmin(team_id));
            }
        }
        self.teams.remove_member(user_id, team_id).await?;

        // Tasks in the team still assigned to the departed user lose
        // their assignee.
        let orphaned = self.tasks.list_assigned_in_team(team_id, user_id).await?;
        for mut task in orphaned {
            task.clear_assignee(self.clock.as_ref());
            self.tasks.update(task).await?;
        }

        let removed_name = self
            .users
            .find_by_id(user_id)
            .await?
            .map_or_else(|| user_id.to_string(), |u| u.username().to_string());
        // Stream notes are a side channel; a failed post never undoes
        // the removal.
        for activity in self.activities.list_for_team(team_id).await? {
            let note = match ActivityMessage::system(
                activity.id(),
                format!("{removed_name} was removed from the team"),
                self.clock.as_ref(),
            ) {
                Ok(note) => note,
                Err(err) => {
                    tracing::warn!(activity_id = %activity.id(), error = %err, "system message dropped");
                    continue;
                }
            };
            if let Err(err) = self.activities.store_message(note).await {
                tracing::warn!(activity_id = %activity.id(), error = %err, "system message dropped");
            }
        }

        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                actor.id(),
                "team.remove_member",
                format!("removed {removed_name} from team '{}'", team.name()),
                self.clock.as_ref(),
            ),
        )
        .await;
        emit_notice(
            self.events.as_ref(),
            [user_id],
            &format!("You have been removed from team '{}'", team.name()),
        )
        .await;
        Ok(())
    }

    /// Deletes a team. Global admins only; refused while the team still
    /// owns members, activities, or tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::GlobalAdminRequired`] for callers
    /// below the global-admin tier and [`TeamServiceError::TeamNotEmpty`]
    /// while dependents remain.
    pub async fn delete_team(&self, actor: &User, team_id: TeamId) -> Result<(), TeamServiceError> {
        if !actor.global_role().is_global_admin() {
            return Err(TeamServiceError::GlobalAdminRequired);
        }
        let team = self.require_team(team_id).await?;
        if !self.teams.members_of(team_id).await?.is_empty()
            || !self.activities.list_for_team(team_id).await?.is_empty()
            || self.tasks.count_for_team(team_id).await? > 0
        {
            return Err(TeamServiceError::TeamNotEmpty(team_id));
        }
        self.teams.delete_team(team_id).await?;
        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                actor.id(),
                "team.delete",
                format!("deleted team '{}'", team.name()),
                self.clock.as_ref(),
            ),
        )
        .await;
        Ok(())
    }

    async fn require_team(&self, team_id: TeamId) -> Result<Team, TeamServiceError> {
        self.teams
            .find_team(team_id)
            .await?
            .ok_or(TeamServiceError::TeamNotFound(team_id))
    }

    async fn require_user(&self, user_id: UserId) -> Result<(), TeamServiceError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(TeamServiceError::UserNotFound(user_id));
        }
        Ok(())
    }

    async fn effective(
        &self,
        actor: &User,
        team_id: TeamId,
    ) -> Result<(Team, EffectiveRole), TeamServiceError> {
        let team = self.require_team(team_id).await?;
        let membership = self.teams.membership(actor.id(), team_id).await?;
        let effective = EffectiveRole::new(actor.global_role(), membership.map(|m| m.role()));
        Ok((team, effective))
    }
}

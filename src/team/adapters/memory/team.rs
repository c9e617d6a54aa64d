//! In-memory team repository for tests and reference deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::team::{
    domain::{
        InvitationId, InvitationStatus, Team, TeamId, TeamInvitation, TeamMembership, TeamStatus,
    },
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};

/// Thread-safe in-memory team repository.
///
/// Memberships are held in a `Vec` so that join order is preserved, which
/// backs the "first team admin" contract of [`TeamRepository::members_of`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamRepository {
    state: Arc<RwLock<InMemoryTeamState>>,
}

#[derive(Debug, Default)]
struct InMemoryTeamState {
    teams: HashMap<TeamId, Team>,
    memberships: Vec<TeamMembership>,
    invitations: HashMap<InvitationId, TeamInvitation>,
}

impl InMemoryTeamRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> TeamRepositoryError {
    TeamRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn store_team(&self, team: &Team) -> TeamRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.teams.contains_key(&team.id()) {
            return Err(TeamRepositoryError::DuplicateTeam(team.id()));
        }
        state.teams.insert(team.id(), team.clone());
        Ok(())
    }

    async fn update_team(&self, team: &Team) -> TeamRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.teams.contains_key(&team.id()) {
            return Err(TeamRepositoryError::TeamNotFound(team.id()));
        }
        state.teams.insert(team.id(), team.clone());
        Ok(())
    }

    async fn find_team(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.teams.get(&id).cloned())
    }

    async fn list_teams(&self, status: Option<TeamStatus>) -> TeamRepositoryResult<Vec<Team>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut teams: Vec<Team> = state
            .teams
            .values()
            .filter(|team| status.is_none_or(|wanted| team.status() == wanted))
            .cloned()
            .collect();
        teams.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        Ok(teams)
    }

    async fn delete_team(&self, id: TeamId) -> TeamRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.teams.remove(&id).is_none() {
            return Err(TeamRepositoryError::TeamNotFound(id));
        }
        state.memberships.retain(|m| m.team_id() != id);
        state.invitations.retain(|_, inv| inv.team_id() != id);
        Ok(())
    }

    async fn add_member(&self, membership: &TeamMembership) -> TeamRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let exists = state
            .memberships
            .iter()
            .any(|m| m.user_id() == membership.user_id() && m.team_id() == membership.team_id());
        if exists {
            return Err(TeamRepositoryError::DuplicateMembership {
                user_id: membership.user_id(),
                team_id: membership.team_id(),
            });
        }
        state.memberships.push(membership.clone());
        Ok(())
    }

    async fn remove_member(&self, user_id: UserId, team_id: TeamId) -> TeamRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let before = state.memberships.len();
        state
            .memberships
            .retain(|m| !(m.user_id() == user_id && m.team_id() == team_id));
        if state.memberships.len() == before {
            return Err(TeamRepositoryError::MembershipNotFound { user_id, team_id });
        }
        Ok(())
    }

    async fn membership(
        &self,
        user_id: UserId,
        team_id: TeamId,
    ) -> TeamRepositoryResult<Option<TeamMembership>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .memberships
            .iter()
            .find(|m| m.user_id() == user_id && m.team_id() == team_id)
            .cloned())
    }

    async fn members_of(&self, team_id: TeamId) -> TeamRepositoryResult<Vec<TeamMembership>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.team_id() == team_id)
            .cloned()
            .collect())
    }

    async fn teams_for_user(
        &self,
        user_id: UserId,
    ) -> TeamRepositoryResult<Vec<(Team, TeamMembership)>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.user_id() == user_id)
            .filter_map(|m| state.teams.get(&m.team_id()).map(|t| (t.clone(), m.clone())))
            .collect())
    }

    async fn store_invitation(&self, invitation: &TeamInvitation) -> TeamRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let pending_exists = state.invitations.values().any(|inv| {
            inv.team_id() == invitation.team_id()
                && inv.user_id() == invitation.user_id()
                && inv.status() == InvitationStatus::Pending
        });
        if pending_exists {
            return Err(TeamRepositoryError::DuplicatePendingInvitation {
                user_id: invitation.user_id(),
                team_id: invitation.team_id(),
            });
        }
        state.invitations.insert(invitation.id(), invitation.clone());
        Ok(())
    }

    async fn update_invitation(&self, invitation: &TeamInvitation) -> TeamRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.invitations.contains_key(&invitation.id()) {
            return Err(TeamRepositoryError::InvitationNotFound(invitation.id()));
        }
        state.invitations.insert(invitation.id(), invitation.clone());
        Ok(())
    }

    async fn find_invitation(
        &self,
        id: InvitationId,
    ) -> TeamRepositoryResult<Option<TeamInvitation>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.invitations.get(&id).cloned())
    }

    async fn pending_invitations_for(
        &self,
        user_id: UserId,
    ) -> TeamRepositoryResult<Vec<TeamInvitation>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut pending: Vec<TeamInvitation> = state
            .invitations
            .values()
            .filter(|inv| inv.user_id() == user_id && inv.status() == InvitationStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|inv| inv.created_at());
        Ok(pending)
    }
}

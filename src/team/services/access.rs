//! Resolution of a user's effective role within a team.

use crate::identity::domain::User;
use crate::team::domain::{EffectiveRole, TeamId};
use crate::team::ports::{TeamRepository, TeamRepositoryError};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while resolving an effective role.
#[derive(Debug, Clone, Error)]
pub enum RoleResolutionError {
    /// The team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),
    /// The persistence layer failed.
    #[error(transparent)]
    Repository(#[from] TeamRepositoryError),
}

/// Combines a user's global role with their team membership, if any.
///
/// Every authorization decision in the engine flows through
/// [`EffectiveRole`]; this resolver is the single place that loads the
/// membership needed to build one.
#[derive(Debug)]
pub struct RoleResolver<R> {
    teams: Arc<R>,
}

impl<R> Clone for RoleResolver<R> {
    fn clone(&self) -> Self {
        Self {
            teams: Arc::clone(&self.teams),
        }
    }
}

impl<R> RoleResolver<R>
where
    R: TeamRepository,
{
    /// Creates a resolver over the given team store.
    #[must_use]
    pub const fn new(teams: Arc<R>) -> Self {
        Self { teams }
    }

    /// Resolves `user`'s effective role in `team_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RoleResolutionError::TeamNotFound`] when the team does
    /// not exist and [`RoleResolutionError::Repository`] on backend
    /// failure.
    pub async fn resolve(
        &self,
        user: &User,
        team_id: TeamId,
    ) -> Result<EffectiveRole, RoleResolutionError> {
        if self.teams.find_team(team_id).await?.is_none() {
            return Err(RoleResolutionError::TeamNotFound(team_id));
        }
        let membership = self.teams.membership(user.id(), team_id).await?;
        Ok(EffectiveRole::new(
            user.global_role(),
            membership.map(|m| m.role()),
        ))
    }
}

//! Activity management and per-activity message streams.

use crate::activity::domain::{
    Activity, ActivityDomainError, ActivityId, ActivityKind, ActivityMessage, ActivityName,
    AuditEntry, MessageId,
};
use crate::activity::ports::{
    ActivityRepository, ActivityRepositoryError, AuditTrail, MessageRepository, NotificationSink,
    emit_audit,
};
use crate::error::ErrorKind;
use crate::identity::domain::User;
use crate::task::ports::{
    CommentRepository, CompletionRequestRepository, ExtensionRequestRepository, TaskRepository,
    TaskRepositoryError,
};
use crate::team::domain::{EffectiveRole, TeamId};
use crate::team::ports::{TeamRepository, TeamRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`ActivityService`] operations.
#[derive(Debug, Error)]
pub enum ActivityServiceError {
    /// A domain invariant was violated.
    #[error(transparent)]
    Domain(#[from] ActivityDomainError),
    /// The team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),
    /// The activity does not exist.
    #[error("activity not found: {0}")]
    ActivityNotFound(ActivityId),
    /// The message does not exist.
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),
    /// The caller is not a member of the owning team.
    #[error("caller is not a member of the owning team")]
    NotTeamMember,
    /// The caller must be a global admin or team admin.
    #[error("only team admins may perform this action")]
    TeamAdminRequired,
    /// Only the author (or a global admin) may modify a message.
    #[error("caller may not modify another user's message")]
    NotMessageAuthor,
    /// Activity persistence failed.
    #[error(transparent)]
    Activities(ActivityRepositoryError),
    /// Team persistence failed.
    #[error(transparent)]
    Teams(#[from] TeamRepositoryError),
    /// Task persistence failed during a cascade.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

impl From<ActivityRepositoryError> for ActivityServiceError {
    fn from(err: ActivityRepositoryError) -> Self {
        match err {
            ActivityRepositoryError::ActivityNotFound(id) => Self::ActivityNotFound(id),
            ActivityRepositoryError::MessageNotFound(id) => Self::MessageNotFound(id),
            other => Self::Activities(other),
        }
    }
}

impl ActivityServiceError {
    /// Classifies the error for transport layers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::InvalidArgument,
            Self::TeamNotFound(_) | Self::ActivityNotFound(_) | Self::MessageNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::NotTeamMember | Self::TeamAdminRequired | Self::NotMessageAuthor => {
                ErrorKind::Forbidden
            }
            Self::Activities(_) | Self::Teams(_) | Self::Tasks(_) => ErrorKind::Internal,
        }
    }
}

/// Service managing activities and their message streams.
#[derive(Debug)]
pub struct ActivityService<A, M, T, E, C> {
    activities: Arc<A>,
    teams: Arc<M>,
    tasks: Arc<T>,
    events: Arc<E>,
    clock: Arc<C>,
}

impl<A, M, T, E, C> ActivityService<A, M, T, E, C>
where
    A: ActivityRepository + MessageRepository,
    M: TeamRepository,
    T: TaskRepository
        + CompletionRequestRepository
        + ExtensionRequestRepository
        + CommentRepository,
    E: AuditTrail + NotificationSink,
    C: Clock,
{
    /// Creates a service over the given collaborators.
    #[must_use]
    pub const fn new(
        activities: Arc<A>,
        teams: Arc<M>,
        tasks: Arc<T>,
        events: Arc<E>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            activities,
            teams,
            tasks,
            events,
            clock,
        }
    }

    /// Creates an activity under a team. Caller must belong to the team
    /// unless they are a global admin.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::NotTeamMember`] for outsiders and
    /// [`ActivityServiceError::TeamNotFound`] for unknown teams.
    pub async fn create(
        &self,
        actor: &User,
        team_id: TeamId,
        name: ActivityName,
        kind: ActivityKind,
    ) -> Result<Activity, ActivityServiceError> {
        let effective = self.effective(actor, team_id).await?;
        if !effective.is_team_member() {
            return Err(ActivityServiceError::NotTeamMember);
        }
        let activity = Activity::new(name, kind, team_id, self.clock.as_ref());
        self.activities.store(activity.clone()).await?;
        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                actor.id(),
                "activity.create",
                format!("created {} '{}'", activity.kind(), activity.name()),
                self.clock.as_ref(),
            ),
        )
        .await;
        Ok(activity)
    }

    /// Lists a team's activities. Caller must belong to the team unless
    /// they are a global admin.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::NotTeamMember`] for outsiders.
    pub async fn list(
        &self,
        actor: &User,
        team_id: TeamId,
    ) -> Result<Vec<Activity>, ActivityServiceError> {
        let effective = self.effective(actor, team_id).await?;
        if !effective.is_team_member() {
            return Err(ActivityServiceError::NotTeamMember);
        }
        Ok(self.activities.list_for_team(team_id).await?)
    }

    /// Deletes an activity and everything it owns: its tasks (with their
    /// completion requests, extension requests, and comments) and its
    /// message stream. Global admins and team admins only.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::TeamAdminRequired`] for callers
    /// below the required tier.
    pub async fn delete(
        &self,
        actor: &User,
        activity_id: ActivityId,
    ) -> Result<(), ActivityServiceError> {
        let activity = self.require_activity(activity_id).await?;
        let effective = self.effective(actor, activity.team_id()).await?;
        if !effective.is_admin() {
            return Err(ActivityServiceError::TeamAdminRequired);
        }
        for task in self.tasks.list_for_activity(activity_id).await? {
            self.tasks.delete_completions_for(task.id()).await?;
            self.tasks.delete_extensions_for(task.id()).await?;
            self.tasks.delete_comments_for(task.id()).await?;
            self.tasks.delete(task.id()).await?;
        }
        self.activities.delete_messages_for(activity_id).await?;
        self.activities.delete(activity_id).await?;
        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                actor.id(),
                "activity.delete",
                format!("deleted activity '{}'", activity.name()),
                self.clock.as_ref(),
            ),
        )
        .await;
        Ok(())
    }

    /// Posts a user message to an activity's stream. Caller must belong
    /// to the owning team.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::NotTeamMember`] for outsiders and
    /// [`ActivityServiceError::Domain`] for blank content.
    pub async fn post_message(
        &self,
        actor: &User,
        activity_id: ActivityId,
        content: &str,
    ) -> Result<ActivityMessage, ActivityServiceError> {
        let activity = self.require_activity(activity_id).await?;
        let effective = self.effective(actor, activity.team_id()).await?;
        if !effective.is_team_member() {
            return Err(ActivityServiceError::NotTeamMember);
        }
        let message =
            ActivityMessage::user(activity_id, actor.id(), content, self.clock.as_ref())?;
        self.activities.store_message(message.clone()).await?;
        Ok(message)
    }

    /// Lists an activity's messages in creation order. Caller must
    /// belong to the owning team.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::NotTeamMember`] for outsiders.
    pub async fn list_messages(
        &self,
        actor: &User,
        activity_id: ActivityId,
    ) -> Result<Vec<ActivityMessage>, ActivityServiceError> {
        let activity = self.require_activity(activity_id).await?;
        let effective = self.effective(actor, activity.team_id()).await?;
        if !effective.is_team_member() {
            return Err(ActivityServiceError::NotTeamMember);
        }
        Ok(self.activities.messages_for(activity_id).await?)
    }

    /// Edits a user message. Only the author or a global admin may edit;
    /// system messages are immutable for everyone.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::NotMessageAuthor`] for other
    /// callers and [`ActivityServiceError::Domain`] for system messages.
    pub async fn edit_message(
        &self,
        actor: &User,
        message_id: MessageId,
        content: &str,
    ) -> Result<ActivityMessage, ActivityServiceError> {
        let Some(mut message) = self.activities.find_message(message_id).await? else {
            return Err(ActivityServiceError::MessageNotFound(message_id));
        };
        if message.author() != Some(actor.id()) && !actor.global_role().is_global_admin() {
            return Err(ActivityServiceError::NotMessageAuthor);
        }
        message.edit(content, self.clock.as_ref())?;
        self.activities.update_message(message.clone()).await?;
        Ok(message)
    }

    /// Deletes a user message. Only the author or a global admin may
    /// delete; system messages are immutable for everyone.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::NotMessageAuthor`] for other
    /// callers and [`ActivityServiceError::Domain`] for system messages.
    pub async fn delete_message(
        &self,
        actor: &User,
        message_id: MessageId,
    ) -> Result<(), ActivityServiceError> {
        let Some(message) = self.activities.find_message(message_id).await? else {
            return Err(ActivityServiceError::MessageNotFound(message_id));
        };
        if message.author().is_none() {
            return Err(ActivityServiceError::Domain(
                ActivityDomainError::SystemMessageImmutable,
            ));
        }
        if message.author() != Some(actor.id()) && !actor.global_role().is_global_admin() {
            return Err(ActivityServiceError::NotMessageAuthor);
        }
        self.activities.delete_message(message_id).await?;
        Ok(())
    }

    async fn require_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Activity, ActivityServiceError> {
        self.activities
            .find(activity_id)
            .await?
            .ok_or(ActivityServiceError::ActivityNotFound(activity_id))
    }

    async fn effective(
        &self,
        actor: &User,
        team_id: TeamId,
    ) -> Result<EffectiveRole, ActivityServiceError> {
        if self.teams.find_team(team_id).await?.is_none() {
            return Err(ActivityServiceError::TeamNotFound(team_id));
        }
        let membership = self.teams.membership(actor.id(), team_id).await?;
        Ok(EffectiveRole::new(
            actor.global_role(),
            membership.map(|m| m.role()),
        ))
    }
}

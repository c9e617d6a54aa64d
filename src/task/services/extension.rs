//! Due-date extension workflow.

use super::lifecycle::TaskServiceError;
use crate::activity::domain::AuditEntry;
use crate::activity::ports::{AuditTrail, NotificationSink, emit_audit, emit_notice};
use crate::identity::domain::User;
use crate::task::domain::{ExtensionRequest, ExtensionRequestId, Task, TaskId};
use crate::task::ports::{ExtensionRequestRepository, TaskRepository};
use crate::team::domain::EffectiveRole;
use crate::team::ports::TeamRepository;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Service running the extension workflow.
#[derive(Debug)]
pub struct ExtensionService<T, M, E, C> {
    tasks: Arc<T>,
    teams: Arc<M>,
    events: Arc<E>,
    clock: Arc<C>,
}

impl<T, M, E, C> ExtensionService<T, M, E, C>
where
    T: TaskRepository + ExtensionRequestRepository,
    M: TeamRepository,
    E: AuditTrail + NotificationSink,
    C: Clock,
{
    /// Creates a service over the given collaborators.
    #[must_use]
    pub const fn new(tasks: Arc<T>, teams: Arc<M>, events: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            teams,
            events,
            clock,
        }
    }

    /// Requests a due-date extension. The default approver is the team's
    /// first admin in join order; a team without one leaves the request
    /// unaddressed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotTeamMember`] for outsiders and
    /// [`TaskServiceError::Domain`] for a blank reason.
    pub async fn request(
        &self,
        actor: &User,
        task_id: TaskId,
        reason: &str,
        requested_due_date: DateTime<Utc>,
    ) -> Result<ExtensionRequest, TaskServiceError> {
        let Some(task) = self.tasks.find(task_id).await? else {
            return Err(TaskServiceError::TaskNotFound(task_id));
        };
        let effective = self.effective(actor, &task).await?;
        if !effective.is_team_member() {
            return Err(TaskServiceError::NotTeamMember);
        }
        let approver = self
            .teams
            .members_of(task.team_id())
            .await?
            .into_iter()
            .find(|m| m.is_admin())
            .map(|m| m.user_id());
        let request = ExtensionRequest::new(
            task_id,
            actor.id(),
            approver,
            reason,
            requested_due_date,
            self.clock.as_ref(),
        )?;
        self.tasks.store_extension(request.clone()).await?;
        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                actor.id(),
                "task.extension_request",
                format!("requested an extension for task '{}'", task.title()),
                self.clock.as_ref(),
            ),
        )
        .await;
        if let Some(approver) = approver {
            emit_notice(
                self.events.as_ref(),
                [approver],
                &format!(
                    "{} requested a due-date extension for '{}'",
                    actor.username(),
                    task.title()
                ),
            )
            .await;
        }
        Ok(request)
    }

    /// Decides a pending extension request. On approval the granted date
    /// (the override when given, the requested date otherwise) becomes
    /// the task's due date and is written back into the request.
    /// Rejection leaves the due date untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TeamAdminRequired`] for callers below
    /// the admin tier and [`TaskServiceError::Domain`] when the request
    /// was already decided.
    pub async fn decide(
        &self,
        actor: &User,
        request_id: ExtensionRequestId,
        approved: bool,
        override_date: Option<DateTime<Utc>>,
    ) -> Result<ExtensionRequest, TaskServiceError> {
        let Some(mut request) = self.tasks.find_extension(request_id).await? else {
            return Err(TaskServiceError::ExtensionRequestNotFound(request_id));
        };
        let Some(mut task) = self.tasks.find(request.task_id()).await? else {
            return Err(TaskServiceError::TaskNotFound(request.task_id()));
        };
        let effective = self.effective(actor, &task).await?;
        if !effective.is_admin() {
            return Err(TaskServiceError::TeamAdminRequired);
        }
        request.decide(actor.id(), approved, override_date, self.clock.utc())?;
        if approved {
            task.set_due_date(Some(request.requested_due_date()), self.clock.as_ref());
            self.tasks.update(task.clone()).await?;
        }
        self.tasks.update_extension(request.clone()).await?;

        let verdict = if approved { "approved" } else { "rejected" };
        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                actor.id(),
                "task.extension_decision",
                format!("{verdict} an extension for task '{}'", task.title()),
                self.clock.as_ref(),
            ),
        )
        .await;
        emit_notice(
            self.events.as_ref(),
            [request.requested_by()],
            &format!("Your extension request for '{}' was {verdict}", task.title()),
        )
        .await;
        Ok(request)
    }

    async fn effective(
        &self,
        actor: &User,
        task: &Task,
    ) -> Result<EffectiveRole, TaskServiceError> {
        let membership = self.teams.membership(actor.id(), task.team_id()).await?;
        Ok(EffectiveRole::new(
            actor.global_role(),
            membership.map(|m| m.role()),
        ))
    }
}

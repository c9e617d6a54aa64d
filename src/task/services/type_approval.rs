//! Type-approval gate for Technical and Procurement tasks created by
//! unprivileged users.

use super::lifecycle::TaskServiceError;
use crate::activity::domain::AuditEntry;
use crate::activity::ports::{AuditTrail, NotificationSink, emit_audit, emit_notice};
use crate::identity::domain::User;
use crate::task::domain::{Task, TaskId};
use crate::task::ports::TaskRepository;
use crate::team::domain::EffectiveRole;
use crate::team::ports::TeamRepository;
use mockable::Clock;
use std::sync::Arc;

/// Service deciding the type-approval gate.
///
/// Approvers are global admins plus the Team Lead and Project Director
/// tiers on either axis; Group Heads, though otherwise privileged, are
/// not type approvers.
#[derive(Debug)]
pub struct TypeApprovalService<T, M, E, C> {
    tasks: Arc<T>,
    teams: Arc<M>,
    events: Arc<E>,
    clock: Arc<C>,
}

impl<T, M, E, C> TypeApprovalService<T, M, E, C>
where
    T: TaskRepository,
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

    /// Decides a pending gate. The decision is terminal and records the
    /// approver and timestamp; the task's lifecycle status is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TypeApprovalNotPermitted`] for callers
    /// outside the approver tier and [`TaskServiceError::Domain`] when
    /// the gate is not pending.
    pub async fn decide(
        &self,
        actor: &User,
        task_id: TaskId,
        approved: bool,
    ) -> Result<Task, TaskServiceError> {
        let Some(mut task) = self.tasks.find(task_id).await? else {
            return Err(TaskServiceError::TaskNotFound(task_id));
        };
        let membership = self.teams.membership(actor.id(), task.team_id()).await?;
        let effective = EffectiveRole::new(actor.global_role(), membership.map(|m| m.role()));
        if !effective.can_approve_type() {
            return Err(TaskServiceError::TypeApprovalNotPermitted);
        }
        task.decide_type(actor.id(), approved, self.clock.as_ref())?;
        self.tasks.update(task.clone()).await?;
        let verdict = if approved { "approved" } else { "rejected" };
        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                actor.id(),
                "task.type_approval",
                format!("{verdict} the type of task '{}'", task.title()),
                self.clock.as_ref(),
            ),
        )
        .await;
        emit_notice(
            self.events.as_ref(),
            [task.created_by()],
            &format!("The type of task '{}' was {verdict}", task.title()),
        )
        .await;
        Ok(task)
    }
}

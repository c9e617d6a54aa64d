//! Proof-backed completion workflow.
//!
//! Submitting parks the task in `Pending Completion` after snapshotting
//! its status; approval completes the task, rejection restores the
//! snapshot exactly.

use super::lifecycle::TaskServiceError;
use crate::activity::domain::AuditEntry;
use crate::activity::ports::{AuditTrail, NotificationSink, emit_audit, emit_notice};
use crate::identity::domain::User;
use crate::task::domain::{
    CompletionRequest, CompletionRequestId, RequestStatus, Task, TaskId, validate_proof,
};
use crate::task::ports::{AttachmentStore, CompletionRequestRepository, TaskRepository};
use crate::team::domain::EffectiveRole;
use crate::team::ports::TeamRepository;
use mockable::Clock;
use std::sync::Arc;

/// Service running the completion workflow.
#[derive(Debug)]
pub struct CompletionService<T, M, S, E, C> {
    tasks: Arc<T>,
    teams: Arc<M>,
    attachments: Arc<S>,
    events: Arc<E>,
    clock: Arc<C>,
}

impl<T, M, S, E, C> CompletionService<T, M, S, E, C>
where
    T: TaskRepository + CompletionRequestRepository,
    M: TeamRepository,
    S: AttachmentStore,
    E: AuditTrail + NotificationSink,
    C: Clock,
{
    /// Creates a service over the given collaborators.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        teams: Arc<M>,
        attachments: Arc<S>,
        events: Arc<E>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            teams,
            attachments,
            events,
            clock,
        }
    }

    /// Submits completion proof for a task. The proof must be a known
    /// document type of at most 10 MiB; at most one pending request may
    /// exist per task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for invalid proof,
    /// [`TaskServiceError::CompletionPending`] while a pending request
    /// exists, and [`TaskServiceError::NotTeamMember`] for outsiders.
    pub async fn submit(
        &self,
        actor: &User,
        task_id: TaskId,
        filename: &str,
        content: &[u8],
    ) -> Result<CompletionRequest, TaskServiceError> {
        let Some(mut task) = self.tasks.find(task_id).await? else {
            return Err(TaskServiceError::TaskNotFound(task_id));
        };
        let effective = self.effective(actor, &task).await?;
        if !effective.is_team_member() {
            return Err(TaskServiceError::NotTeamMember);
        }
        validate_proof(filename, content.len() as u64)?;
        // Checked before the proof is saved so a conflicting submission
        // never leaves an orphaned attachment behind; the store enforces
        // the same invariant against racing submissions.
        let pending_exists = self
            .tasks
            .completions_for_task(task_id)
            .await?
            .iter()
            .any(|r| r.status() == RequestStatus::Pending);
        if pending_exists {
            return Err(TaskServiceError::CompletionPending(task_id));
        }
        let key = self.attachments.save(filename, content).await?;
        let request = CompletionRequest::new(
            task_id,
            actor.id(),
            task.status(),
            key.as_str(),
            self.clock.as_ref(),
        );
        // Stored before the task is parked so a conflicting submission
        // leaves the task untouched.
        self.tasks.store_completion(request.clone()).await?;
        task.enter_pending_completion(self.clock.as_ref());
        self.tasks.update(task.clone()).await?;

        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                actor.id(),
                "task.completion_request",
                format!("requested completion of task '{}'", task.title()),
                self.clock.as_ref(),
            ),
        )
        .await;
        let admins: Vec<_> = self
            .teams
            .members_of(task.team_id())
            .await?
            .into_iter()
            .filter(|m| m.is_admin())
            .map(|m| m.user_id())
            .collect();
        emit_notice(
            self.events.as_ref(),
            admins,
            &format!(
                "{} requested completion of task '{}'",
                actor.username(),
                task.title()
            ),
        )
        .await;
        Ok(request)
    }

    /// Decides a pending completion request. Approval completes the
    /// task; rejection restores the status snapshotted at submission,
    /// regardless of interim changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TeamAdminRequired`] for callers below
    /// the admin tier and [`TaskServiceError::Domain`] when the request
    /// was already decided.
    pub async fn decide(
        &self,
        actor: &User,
        request_id: CompletionRequestId,
        approved: bool,
    ) -> Result<CompletionRequest, TaskServiceError> {
        let Some(mut request) = self.tasks.find_completion(request_id).await? else {
            return Err(TaskServiceError::CompletionRequestNotFound(request_id));
        };
        let Some(mut task) = self.tasks.find(request.task_id()).await? else {
            return Err(TaskServiceError::TaskNotFound(request.task_id()));
        };
        let effective = self.effective(actor, &task).await?;
        if !effective.is_admin() {
            return Err(TaskServiceError::TeamAdminRequired);
        }
        request.decide(actor.id(), approved, self.clock.utc())?;
        if approved {
            task.complete(self.clock.as_ref());
        } else {
            task.restore_status(request.previous_status(), self.clock.as_ref());
        }
        self.tasks.update_completion(request.clone()).await?;
        self.tasks.update(task.clone()).await?;

        let verdict = if approved { "approved" } else { "rejected" };
        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(
                actor.id(),
                "task.completion_decision",
                format!("{verdict} completion of task '{}'", task.title()),
                self.clock.as_ref(),
            ),
        )
        .await;
        emit_notice(
            self.events.as_ref(),
            [request.submitted_by()],
            &format!("Your completion request for '{}' was {verdict}", task.title()),
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

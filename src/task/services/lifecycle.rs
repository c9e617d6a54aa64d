//! Task lifecycle: creation, visibility, approval, status moves,
//! assignment, due dates, stage moves, and deletion.

use crate::activity::domain::{ActivityId, ActivityMessage, AuditEntry};
use crate::activity::ports::{
    ActivityRepository, ActivityRepositoryError, AuditTrail, MessageRepository, NotificationSink,
    emit_audit, emit_notice,
};
use crate::error::ErrorKind;
use crate::identity::domain::{GlobalRole, User, UserId};
use crate::identity::ports::{UserRepository, UserRepositoryError};
use crate::task::domain::{
    CompletionRequestId, ExtensionRequestId, PercentShare, Priority, ProcurementStage, Task,
    TaskAssignment, TaskComment, TaskDomainError, TaskDraft, TaskId, TaskStatus, TaskTitle,
    TaskType, TypeApproval,
};
use crate::task::ports::{
    AttachmentStoreError, CommentRepository, CompletionRequestRepository,
    ExtensionRequestRepository, TaskRepository, TaskRepositoryError,
};
use crate::team::domain::{EffectiveRole, Team, TeamId};
use crate::team::ports::{TeamRepository, TeamRepositoryError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by the task services.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// A domain invariant was violated.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),
    /// The activity does not exist.
    #[error("activity not found: {0}")]
    ActivityNotFound(ActivityId),
    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    /// The completion request does not exist.
    #[error("completion request not found: {0}")]
    CompletionRequestNotFound(CompletionRequestId),
    /// The extension request does not exist.
    #[error("extension request not found: {0}")]
    ExtensionRequestNotFound(ExtensionRequestId),
    /// A task must reference an activity or, legacy, a team.
    #[error("task must reference an activity or a team")]
    NoOwner,
    /// The caller is not a member of the owning team.
    #[error("caller is not a member of the owning team")]
    NotTeamMember,
    /// The proposed assignee is not a member of the owning team.
    #[error("assignee {0} is not a member of the owning team")]
    AssigneeNotMember(UserId),
    /// The team restricts assignment to its admins.
    #[error("this team only lets admins assign tasks to others")]
    AssignmentRestricted,
    /// The caller's global role may not approve tasks.
    #[error("caller may not approve tasks")]
    ApprovalNotPermitted,
    /// Post-creation reassignment is reserved for global admins.
    #[error("caller may not reassign tasks")]
    ReassignmentNotPermitted,
    /// The caller must be a global admin or team admin.
    #[error("only team admins may perform this action")]
    TeamAdminRequired,
    /// The caller may not decide type approvals.
    #[error("caller may not decide type approvals")]
    TypeApprovalNotPermitted,
    /// The task already has a pending completion request.
    #[error("task {0} already has a pending completion request")]
    CompletionPending(TaskId),
    /// Completion must go through the proof-upload workflow.
    #[error("submit a completion request with proof instead of setting Completed directly")]
    DirectCompletionNotPermitted,
    /// The status is not a valid direct transition target.
    #[error("'{0}' is not a valid direct status target")]
    InvalidStatusTarget(TaskStatus),
    /// Attachment storage failed.
    #[error(transparent)]
    Attachments(#[from] AttachmentStoreError),
    /// Task persistence failed.
    #[error(transparent)]
    Tasks(TaskRepositoryError),
    /// Team persistence failed.
    #[error(transparent)]
    Teams(#[from] TeamRepositoryError),
    /// User persistence failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
    /// Activity persistence failed.
    #[error(transparent)]
    Activities(#[from] ActivityRepositoryError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::TaskNotFound(id) => Self::TaskNotFound(id),
            TaskRepositoryError::PendingCompletionExists(id) => Self::CompletionPending(id),
            TaskRepositoryError::CompletionRequestNotFound(id) => {
                Self::CompletionRequestNotFound(id)
            }
            TaskRepositoryError::ExtensionRequestNotFound(id) => {
                Self::ExtensionRequestNotFound(id)
            }
            other => Self::Tasks(other),
        }
    }
}

impl TaskServiceError {
    /// Classifies the error for transport layers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => match err {
                TaskDomainError::StageRegression { .. } => ErrorKind::InvalidTransition,
                TaskDomainError::StageNotProcurement
                | TaskDomainError::TypeApprovalNotPending(_)
                | TaskDomainError::RequestNotPending(_) => ErrorKind::InvalidState,
                _ => ErrorKind::InvalidArgument,
            },
            Self::TaskNotFound(_)
            | Self::TeamNotFound(_)
            | Self::ActivityNotFound(_)
            | Self::UserNotFound(_)
            | Self::CompletionRequestNotFound(_)
            | Self::ExtensionRequestNotFound(_) => ErrorKind::NotFound,
            Self::NoOwner | Self::AssigneeNotMember(_) => ErrorKind::InvalidArgument,
            Self::NotTeamMember
            | Self::AssignmentRestricted
            | Self::ApprovalNotPermitted
            | Self::ReassignmentNotPermitted
            | Self::TeamAdminRequired
            | Self::TypeApprovalNotPermitted => ErrorKind::Forbidden,
            Self::CompletionPending(_) => ErrorKind::Conflict,
            Self::DirectCompletionNotPermitted | Self::InvalidStatusTarget(_) => {
                ErrorKind::InvalidTransition
            }
            Self::Attachments(_)
            | Self::Tasks(_)
            | Self::Teams(_)
            | Self::Users(_)
            | Self::Activities(_) => ErrorKind::Internal,
        }
    }
}

/// Payload for opening a task, before authorization trims it.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Scheduling priority.
    pub priority: Priority,
    /// Due date, when one is set.
    pub due_date: Option<DateTime<Utc>>,
    /// Functional category.
    pub task_type: TaskType,
    /// Owning activity; its team becomes the owning team.
    pub activity_id: Option<ActivityId>,
    /// Legacy direct team reference, used when no activity is given.
    pub team_id: Option<TeamId>,
    /// Requested single assignee.
    pub assigned_to: Option<UserId>,
    /// Requested lead.
    pub lead_person: Option<UserId>,
    /// Requested workload share for the single assignee.
    pub percent_share: Option<PercentShare>,
    /// Requested closure approver.
    pub closure_approver: Option<UserId>,
    /// Requested multi-assignee rows.
    pub assignments: Vec<TaskAssignment>,
}

/// Optional narrowing applied by [`TaskLifecycleService::list`]. The
/// default filter matches everything the caller may see.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    /// Keep only tasks owned by this team.
    pub team_id: Option<TeamId>,
    /// Keep only tasks assigned to this user, as single assignee or as
    /// a multi-assignee row.
    pub assigned_to: Option<UserId>,
    /// Keep only tasks in this status.
    pub status: Option<TaskStatus>,
}

/// Service governing the task lifecycle.
#[derive(Debug)]
pub struct TaskLifecycleService<T, M, U, A, E, C> {
    tasks: Arc<T>,
    teams: Arc<M>,
    users: Arc<U>,
    activities: Arc<A>,
    events: Arc<E>,
    clock: Arc<C>,
}

impl<T, M, U, A, E, C> TaskLifecycleService<T, M, U, A, E, C>
where
    T: TaskRepository
        + CompletionRequestRepository
        + ExtensionRequestRepository
        + CommentRepository,
    M: TeamRepository,
    U: UserRepository,
    A: ActivityRepository + MessageRepository,
    E: AuditTrail + NotificationSink,
    C: Clock,
{
    /// Creates a service over the given collaborators.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        teams: Arc<M>,
        users: Arc<U>,
        activities: Arc<A>,
        events: Arc<E>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            teams,
            users,
            activities,
            events,
            clock,
        }
    }

    /// Opens a task.
    ///
    /// Callers below the privileged tier cannot steer assignment: any
    /// requested assignee, lead, share, or multi-assignee rows in the
    /// payload are discarded without error. Tasks created by a plain
    /// member start unapproved, and Technical or Procurement tasks from
    /// unprivileged creators enter the type-approval gate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotTeamMember`] for outsiders,
    /// [`TaskServiceError::AssignmentRestricted`] when the team reserves
    /// assignment for admins, and [`TaskServiceError::AssigneeNotMember`]
    /// for assignees outside the team.
    pub async fn create(
        &self,
        actor: &User,
        request: CreateTask,
    ) -> Result<Task, TaskServiceError> {
        let (team, activity_id) = self.resolve_owner(&request).await?;
        let effective = self.effective_in(actor, &team).await?;
        if !effective.is_team_member() {
            return Err(TaskServiceError::NotTeamMember);
        }

        if team.only_admins_assign()
            && !effective.is_admin()
            && request
                .assigned_to
                .is_some_and(|assignee| assignee != actor.id())
        {
            return Err(TaskServiceError::AssignmentRestricted);
        }

        let privileged = effective.is_privileged();
        let (assigned_to, lead_person, percent_share, assignments) = if privileged {
            (
                request.assigned_to,
                request.lead_person,
                request.percent_share,
                request.assignments,
            )
        } else {
            // Unprivileged creators cannot steer assignment; the payload
            // fields are dropped, not rejected.
            (None, None, None, Vec::new())
        };

        if let Some(assignee) = assigned_to {
            self.require_member(&team, assignee).await?;
        }
        for assignment in &assignments {
            self.require_member(&team, assignment.user_id()).await?;
        }

        let type_approval = if !privileged && request.task_type.needs_type_approval() {
            TypeApproval::pending()
        } else {
            TypeApproval::not_required()
        };
        let draft = TaskDraft {
            title: TaskTitle::new(request.title)?,
            description: request.description,
            priority: request.priority,
            due_date: request.due_date,
            task_type: request.task_type,
            team_id: team.id(),
            activity_id,
            created_by: actor.id(),
            assigned_to,
            lead_person,
            percent_share,
            closure_approver: request.closure_approver,
            assignments,
            is_approved: actor.global_role() != GlobalRole::Member,
            type_approval,
        };
        let task = Task::new(draft, self.clock.as_ref())?;
        self.tasks.store(task.clone()).await?;

        self.announce(
            actor,
            &task,
            "task.create",
            &format!("created task '{}'", task.title()),
        )
        .await;
        if let Some(assignee) = task.assigned_to() {
            emit_notice(
                self.events.as_ref(),
                [assignee],
                &format!("You have been assigned to task '{}'", task.title()),
            )
            .await;
        }
        Ok(task)
    }

    /// Lists the tasks visible to the caller, narrowed by `filter`.
    /// Global admins see every task; everyone else sees tasks of
    /// approved teams they belong to, and nothing when they belong to
    /// none.
    ///
    /// Single assignees who have since left the team are cleared as the
    /// list is built, and the clearing is persisted. The assignee filter
    /// is applied after that repair, so it never matches a stale
    /// assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Tasks`] on persistence failure.
    pub async fn list(
        &self,
        actor: &User,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, TaskServiceError> {
        let mut team_ids: Vec<TeamId> = if actor.global_role().is_global_admin() {
            self.teams
                .list_teams(None)
                .await?
                .into_iter()
                .map(|team| team.id())
                .collect()
        } else {
            self.teams
                .teams_for_user(actor.id())
                .await?
                .into_iter()
                .filter(|(team, _)| team.is_approved())
                .map(|(team, _)| team.id())
                .collect()
        };
        if let Some(team_id) = filter.team_id {
            team_ids.retain(|id| *id == team_id);
        }
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut tasks = self.tasks.list_for_teams(&team_ids).await?;
        for task in &mut tasks {
            let Some(assignee) = task.assigned_to() else {
                continue;
            };
            if self.teams.membership(assignee, task.team_id()).await?.is_none() {
                task.clear_assignee(self.clock.as_ref());
                self.tasks.update(task.clone()).await?;
            }
        }
        tasks.retain(|task| {
            filter
                .assigned_to
                .is_none_or(|user| task.is_assigned_to(user))
                && filter.status.is_none_or(|status| task.status() == status)
        });
        Ok(tasks)
    }

    /// Approves a task. Open to every global role above plain member;
    /// re-approving is a no-op returning the current state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::ApprovalNotPermitted`] for plain
    /// members.
    pub async fn approve(&self, actor: &User, task_id: TaskId) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(task_id).await?;
        let effective = self.effective_for(actor, &task).await?;
        if !effective.can_approve_task() {
            return Err(TaskServiceError::ApprovalNotPermitted);
        }
        if !task.approve(self.clock.as_ref()) {
            return Ok(task);
        }
        self.tasks.update(task.clone()).await?;
        self.announce(
            actor,
            &task,
            "task.approve",
            &format!("approved task '{}'", task.title()),
        )
        .await;
        Ok(task)
    }

    /// Applies a direct status change. `Pending Completion` is never a
    /// valid target, and only global or team admins may set `Completed`
    /// directly; everyone else goes through the completion workflow.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::InvalidStatusTarget`] for
    /// non-direct targets and
    /// [`TaskServiceError::DirectCompletionNotPermitted`] when a
    /// non-admin sets `Completed`.
    pub async fn update_status(
        &self,
        actor: &User,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(task_id).await?;
        let effective = self.effective_for(actor, &task).await?;
        if !effective.is_team_member() {
            return Err(TaskServiceError::NotTeamMember);
        }
        if !status.is_direct_target() {
            return Err(TaskServiceError::InvalidStatusTarget(status));
        }
        if status == TaskStatus::Completed && !effective.is_admin() {
            return Err(TaskServiceError::DirectCompletionNotPermitted);
        }
        task.set_status(status, self.clock.as_ref());
        self.tasks.update(task.clone()).await?;
        self.announce(
            actor,
            &task,
            "task.status",
            &format!("moved task '{}' to {status}", task.title()),
        )
        .await;
        Ok(task)
    }

    /// Replaces the single assignee. Reserved for the global admin tier;
    /// the new assignee must belong to the owning team.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::ReassignmentNotPermitted`] for callers
    /// below the tier and [`TaskServiceError::AssigneeNotMember`] for
    /// assignees outside the team.
    pub async fn update_assignee(
        &self,
        actor: &User,
        task_id: TaskId,
        assignee: Option<UserId>,
    ) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(task_id).await?;
        let effective = self.effective_for(actor, &task).await?;
        if !effective.can_reassign() {
            return Err(TaskServiceError::ReassignmentNotPermitted);
        }
        if let Some(assignee) = assignee {
            let team = self.require_team(task.team_id()).await?;
            self.require_member(&team, assignee).await?;
        }
        task.assign(assignee, self.clock.as_ref());
        self.tasks.update(task.clone()).await?;
        self.announce(
            actor,
            &task,
            "task.assign",
            &format!("reassigned task '{}'", task.title()),
        )
        .await;
        if let Some(assignee) = assignee {
            emit_notice(
                self.events.as_ref(),
                [assignee],
                &format!("You have been assigned to task '{}'", task.title()),
            )
            .await;
        }
        Ok(task)
    }

    /// Sets or clears the due date. Global and team admins only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TeamAdminRequired`] for callers below
    /// the tier.
    pub async fn update_due_date(
        &self,
        actor: &User,
        task_id: TaskId,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(task_id).await?;
        let effective = self.effective_for(actor, &task).await?;
        if !effective.is_admin() {
            return Err(TaskServiceError::TeamAdminRequired);
        }
        task.set_due_date(due_date, self.clock.as_ref());
        self.tasks.update(task.clone()).await?;
        self.announce(
            actor,
            &task,
            "task.due_date",
            &format!("changed the due date of task '{}'", task.title()),
        )
        .await;
        Ok(task)
    }

    /// Moves the procurement stage, or clears it. Open to every member
    /// of the owning team; the stage pipeline rules apply.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] with
    /// [`TaskDomainError::StageNotProcurement`] for non-procurement
    /// tasks and [`TaskDomainError::StageRegression`] for forbidden
    /// movements.
    pub async fn update_procurement_stage(
        &self,
        actor: &User,
        task_id: TaskId,
        stage: Option<ProcurementStage>,
    ) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(task_id).await?;
        let effective = self.effective_for(actor, &task).await?;
        if !effective.is_team_member() {
            return Err(TaskServiceError::NotTeamMember);
        }
        task.update_stage(stage, self.clock.as_ref())?;
        self.tasks.update(task.clone()).await?;
        let detail = match stage {
            Some(stage) => format!("moved task '{}' to stage {stage}", task.title()),
            None => format!("cleared the stage of task '{}'", task.title()),
        };
        self.announce(actor, &task, "task.stage", &detail).await;
        Ok(task)
    }

    /// Posts a comment on a task. Open to every member of the owning
    /// team.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotTeamMember`] for outsiders and
    /// [`TaskServiceError::Domain`] with
    /// [`TaskDomainError::EmptyComment`] for blank content.
    pub async fn post_comment(
        &self,
        actor: &User,
        task_id: TaskId,
        content: &str,
    ) -> Result<TaskComment, TaskServiceError> {
        let task = self.require_task(task_id).await?;
        let effective = self.effective_for(actor, &task).await?;
        if !effective.is_team_member() {
            return Err(TaskServiceError::NotTeamMember);
        }
        let comment = TaskComment::new(task_id, actor.id(), content, self.clock.as_ref())?;
        self.tasks.store_comment(comment.clone()).await?;
        self.announce(
            actor,
            &task,
            "task.comment",
            &format!("commented on task '{}'", task.title()),
        )
        .await;
        Ok(comment)
    }

    /// Lists a task's comments in creation order. Open to every member
    /// of the owning team.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotTeamMember`] for outsiders.
    pub async fn list_comments(
        &self,
        actor: &User,
        task_id: TaskId,
    ) -> Result<Vec<TaskComment>, TaskServiceError> {
        let task = self.require_task(task_id).await?;
        let effective = self.effective_for(actor, &task).await?;
        if !effective.is_team_member() {
            return Err(TaskServiceError::NotTeamMember);
        }
        Ok(self.tasks.comments_for_task(task_id).await?)
    }

    /// Deletes a task and its completion requests, extension requests,
    /// and comments. Global and team admins only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TeamAdminRequired`] for callers below
    /// the tier.
    pub async fn delete(&self, actor: &User, task_id: TaskId) -> Result<(), TaskServiceError> {
        let task = self.require_task(task_id).await?;
        let effective = self.effective_for(actor, &task).await?;
        if !effective.is_admin() {
            return Err(TaskServiceError::TeamAdminRequired);
        }
        self.tasks.delete_completions_for(task_id).await?;
        self.tasks.delete_extensions_for(task_id).await?;
        self.tasks.delete_comments_for(task_id).await?;
        self.tasks.delete(task_id).await?;
        self.announce(
            actor,
            &task,
            "task.delete",
            &format!("deleted task '{}'", task.title()),
        )
        .await;
        Ok(())
    }

    async fn resolve_owner(
        &self,
        request: &CreateTask,
    ) -> Result<(Team, Option<ActivityId>), TaskServiceError> {
        if let Some(activity_id) = request.activity_id {
            let Some(activity) = self.activities.find(activity_id).await? else {
                return Err(TaskServiceError::ActivityNotFound(activity_id));
            };
            let team = self.require_team(activity.team_id()).await?;
            return Ok((team, Some(activity_id)));
        }
        if let Some(team_id) = request.team_id {
            let team = self.require_team(team_id).await?;
            return Ok((team, None));
        }
        Err(TaskServiceError::NoOwner)
    }

    async fn require_task(&self, task_id: TaskId) -> Result<Task, TaskServiceError> {
        self.tasks
            .find(task_id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(task_id))
    }

    async fn require_team(&self, team_id: TeamId) -> Result<Team, TaskServiceError> {
        self.teams
            .find_team(team_id)
            .await?
            .ok_or(TaskServiceError::TeamNotFound(team_id))
    }

    async fn require_member(&self, team: &Team, user_id: UserId) -> Result<(), TaskServiceError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(TaskServiceError::UserNotFound(user_id));
        }
        if self.teams.membership(user_id, team.id()).await?.is_none() {
            return Err(TaskServiceError::AssigneeNotMember(user_id));
        }
        Ok(())
    }

    async fn effective_in(
        &self,
        actor: &User,
        team: &Team,
    ) -> Result<EffectiveRole, TaskServiceError> {
        let membership = self.teams.membership(actor.id(), team.id()).await?;
        Ok(EffectiveRole::new(
            actor.global_role(),
            membership.map(|m| m.role()),
        ))
    }

    async fn effective_for(
        &self,
        actor: &User,
        task: &Task,
    ) -> Result<EffectiveRole, TaskServiceError> {
        let team = self.require_team(task.team_id()).await?;
        self.effective_in(actor, &team).await
    }

    /// Records an audit entry and, when the task lives in an activity,
    /// posts a system message there. Both are best-effort.
    async fn announce(&self, actor: &User, task: &Task, action: &str, detail: &str) {
        emit_audit(
            self.events.as_ref(),
            AuditEntry::new(actor.id(), action, detail, self.clock.as_ref()),
        )
        .await;
        let Some(activity_id) = task.activity_id() else {
            return;
        };
        let message = match ActivityMessage::system(activity_id, detail, self.clock.as_ref()) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(%activity_id, error = %err, "system message dropped");
                return;
            }
        };
        if let Err(err) = self.activities.store_message(message).await {
            tracing::warn!(%activity_id, error = %err, "system message dropped");
        }
    }
}

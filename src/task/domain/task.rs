//! Task aggregate: the unit of work tracked by the engine.

use super::assignment::{TaskAssignment, mirrored_assignee, validate_assignments};
use super::error::TaskDomainError;
use super::ids::TaskId;
use super::kind::{TaskType, TypeApproval, TypeApprovalStatus};
use super::procurement::ProcurementStage;
use super::status::{Priority, TaskStatus};
use crate::activity::domain::ActivityId;
use crate::identity::domain::UserId;
use crate::team::domain::TeamId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the trimmed value is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to open a new task. Authorization and field
/// discarding happen in the service layer; by the time a draft reaches
/// [`Task::new`] its fields are what the task will actually carry.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    /// Task title.
    pub title: TaskTitle,
    /// Free-form description.
    pub description: Option<String>,
    /// Scheduling priority.
    pub priority: Priority,
    /// Due date, when one is set.
    pub due_date: Option<DateTime<Utc>>,
    /// Functional category.
    pub task_type: TaskType,
    /// Owning team.
    pub team_id: TeamId,
    /// Owning activity, absent for team-level tasks.
    pub activity_id: Option<ActivityId>,
    /// Creating user.
    pub created_by: UserId,
    /// Single assignee, mutually exclusive with `assignments`.
    pub assigned_to: Option<UserId>,
    /// Designated lead.
    pub lead_person: Option<UserId>,
    /// Workload share for a single assignee.
    pub percent_share: Option<super::assignment::PercentShare>,
    /// User expected to sign off completion.
    pub closure_approver: Option<UserId>,
    /// Multi-assignee rows; when non-empty, `assigned_to` and
    /// `lead_person` are derived from them.
    pub assignments: Vec<TaskAssignment>,
    /// Whether the task starts approved.
    pub is_approved: bool,
    /// Initial type-approval gate state.
    pub type_approval: TypeApproval,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    task_type: TaskType,
    is_approved: bool,
    type_approval: TypeApproval,
    procurement_stage: Option<ProcurementStage>,
    team_id: TeamId,
    activity_id: Option<ActivityId>,
    created_by: UserId,
    assigned_to: Option<UserId>,
    lead_person: Option<UserId>,
    percent_share: Option<super::assignment::PercentShare>,
    closure_approver: Option<UserId>,
    assignments: Vec<TaskAssignment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Opens a new task in `To Do`.
    ///
    /// When the draft carries multi-assignee rows, the mirrored single
    /// assignee and lead are derived from them: the marked lead, or the
    /// first row when none is marked.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MultipleLeads`] when more than one
    /// assignment is marked as lead.
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        validate_assignments(&draft.assignments)?;
        let (assigned_to, lead_person) = if draft.assignments.is_empty() {
            (draft.assigned_to, draft.lead_person)
        } else {
            let mirrored = mirrored_assignee(&draft.assignments);
            (mirrored, mirrored)
        };
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            status: TaskStatus::ToDo,
            priority: draft.priority,
            due_date: draft.due_date,
            task_type: draft.task_type,
            is_approved: draft.is_approved,
            type_approval: draft.type_approval,
            procurement_stage: None,
            team_id: draft.team_id,
            activity_id: draft.activity_id,
            created_by: draft.created_by,
            assigned_to,
            lead_person,
            percent_share: draft.percent_share,
            closure_approver: draft.closure_approver,
            assignments: draft.assignments,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, when one is set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, when one is set.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the functional category.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Whether the task has been approved.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        self.is_approved
    }

    /// Returns the type-approval gate state.
    #[must_use]
    pub const fn type_approval(&self) -> TypeApproval {
        self.type_approval
    }

    /// Returns the procurement stage, when one is set.
    #[must_use]
    pub const fn procurement_stage(&self) -> Option<ProcurementStage> {
        self.procurement_stage
    }

    /// Returns the owning team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the owning activity, when one exists.
    #[must_use]
    pub const fn activity_id(&self) -> Option<ActivityId> {
        self.activity_id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the single assignee, when one is set.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the designated lead, when one is set.
    #[must_use]
    pub const fn lead_person(&self) -> Option<UserId> {
        self.lead_person
    }

    /// Returns the single-assignee workload share, when one is set.
    #[must_use]
    pub const fn percent_share(&self) -> Option<super::assignment::PercentShare> {
        self.percent_share
    }

    /// Returns the expected closure approver, when one is set.
    #[must_use]
    pub const fn closure_approver(&self) -> Option<UserId> {
        self.closure_approver
    }

    /// Returns the multi-assignee rows.
    #[must_use]
    pub fn assignments(&self) -> &[TaskAssignment] {
        &self.assignments
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user` appears in either assignee representation.
    #[must_use]
    pub fn is_assigned_to(&self, user: UserId) -> bool {
        self.assigned_to == Some(user) || self.assignments.iter().any(|a| a.user_id() == user)
    }

    /// Marks the task approved. Returns `false` when it already was;
    /// re-approval is a no-op, not an error.
    pub fn approve(&mut self, clock: &impl Clock) -> bool {
        if self.is_approved {
            return false;
        }
        self.is_approved = true;
        self.touch(clock);
        true
    }

    /// Applies a direct status change. The caller has already verified
    /// the target is a permitted direct transition.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Parks the task in `Pending Completion`, returning the status it
    /// held beforehand for snapshotting.
    pub fn enter_pending_completion(&mut self, clock: &impl Clock) -> TaskStatus {
        let previous = self.status;
        self.status = TaskStatus::PendingCompletion;
        self.touch(clock);
        previous
    }

    /// Restores a snapshotted status after a rejected completion.
    pub fn restore_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Marks the task completed after an approved completion request.
    pub fn complete(&mut self, clock: &impl Clock) {
        self.status = TaskStatus::Completed;
        self.touch(clock);
    }

    /// Records a type-approval decision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TypeApprovalNotPending`] unless the
    /// gate is currently `pending`.
    pub fn decide_type(
        &mut self,
        approver: UserId,
        approved: bool,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let now = clock.utc();
        self.type_approval.decide(approver, approved, now)?;
        self.updated_at = now;
        Ok(())
    }

    /// Whether the type-approval gate is still pending.
    #[must_use]
    pub const fn type_approval_pending(&self) -> bool {
        matches!(self.type_approval.status(), TypeApprovalStatus::Pending)
    }

    /// Moves the procurement stage, or clears it when `stage` is `None`.
    /// Clearing is always allowed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StageNotProcurement`] for
    /// non-procurement tasks and [`TaskDomainError::StageRegression`]
    /// when the pipeline forbids the movement.
    pub fn update_stage(
        &mut self,
        stage: Option<ProcurementStage>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.task_type != TaskType::Procurement {
            return Err(TaskDomainError::StageNotProcurement);
        }
        if let (Some(from), Some(to)) = (self.procurement_stage, stage) {
            if !from.can_move_to(to) {
                return Err(TaskDomainError::StageRegression { from, to });
            }
        }
        self.procurement_stage = stage;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the single assignee, clearing multi-assignee rows.
    pub fn assign(&mut self, assignee: Option<UserId>, clock: &impl Clock) {
        self.assigned_to = assignee;
        self.assignments.clear();
        self.touch(clock);
    }

    /// Clears the single assignee without touching multi-assignee rows.
    /// Used by the lazy repair applied when an assignee has left the
    /// team.
    pub fn clear_assignee(&mut self, clock: &impl Clock) {
        self.assigned_to = None;
        self.touch(clock);
    }

    /// Sets or clears the due date.
    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>, clock: &impl Clock) {
        self.due_date = due_date;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

//! Completion and extension requests raised against tasks.

use super::error::TaskDomainError;
use super::ids::{CompletionRequestId, ExtensionRequestId, TaskId};
use super::status::TaskStatus;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision state shared by completion and extension requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting a decision.
    Pending,
    /// Granted; terminal.
    Approved,
    /// Refused; terminal.
    Rejected,
}

impl RequestStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to mark a task completed, backed by an uploaded proof.
///
/// At most one pending completion request may exist per task; the
/// repository enforces that uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    id: CompletionRequestId,
    task_id: TaskId,
    submitted_by: UserId,
    previous_status: TaskStatus,
    attachment: String,
    status: RequestStatus,
    decided_by: Option<UserId>,
    decided_at: Option<DateTime<Utc>>,
    submitted_at: DateTime<Utc>,
}

impl CompletionRequest {
    /// Opens a pending completion request, snapshotting the task's status
    /// at submission time.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        submitted_by: UserId,
        previous_status: TaskStatus,
        attachment: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: CompletionRequestId::new(),
            task_id,
            submitted_by,
            previous_status,
            attachment: attachment.into(),
            status: RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
            submitted_at: clock.utc(),
        }
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn id(&self) -> CompletionRequestId {
        self.id
    }

    /// Returns the task under review.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the submitting user.
    #[must_use]
    pub const fn submitted_by(&self) -> UserId {
        self.submitted_by
    }

    /// Returns the task status snapshotted at submission.
    #[must_use]
    pub const fn previous_status(&self) -> TaskStatus {
        self.previous_status
    }

    /// Returns the stored attachment reference.
    #[must_use]
    pub fn attachment(&self) -> &str {
        &self.attachment
    }

    /// Returns the decision state.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Returns who decided the request, once decided.
    #[must_use]
    pub const fn decided_by(&self) -> Option<UserId> {
        self.decided_by
    }

    /// Returns when the request was decided, once decided.
    #[must_use]
    pub const fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    /// Returns when the request was submitted.
    #[must_use]
    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Records a terminal decision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RequestNotPending`] unless the request
    /// is currently pending.
    pub fn decide(
        &mut self,
        approver: UserId,
        approved: bool,
        decided_at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if self.status != RequestStatus::Pending {
            return Err(TaskDomainError::RequestNotPending(self.status));
        }
        self.status = if approved {
            RequestStatus::Approved
        } else {
            RequestStatus::Rejected
        };
        self.decided_by = Some(approver);
        self.decided_at = Some(decided_at);
        Ok(())
    }
}

/// A request to push back a task's due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRequest {
    id: ExtensionRequestId,
    task_id: TaskId,
    requested_by: UserId,
    requested_to: Option<UserId>,
    reason: String,
    requested_due_date: DateTime<Utc>,
    status: RequestStatus,
    decided_by: Option<UserId>,
    decided_at: Option<DateTime<Utc>>,
    submitted_at: DateTime<Utc>,
}

impl ExtensionRequest {
    /// Opens a pending extension request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyExtensionReason`] when the trimmed
    /// reason is empty.
    pub fn new(
        task_id: TaskId,
        requested_by: UserId,
        requested_to: Option<UserId>,
        reason: impl Into<String>,
        requested_due_date: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw = reason.into();
        let reason = raw.trim();
        if reason.is_empty() {
            return Err(TaskDomainError::EmptyExtensionReason);
        }
        Ok(Self {
            id: ExtensionRequestId::new(),
            task_id,
            requested_by,
            requested_to,
            reason: reason.to_owned(),
            requested_due_date,
            status: RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
            submitted_at: clock.utc(),
        })
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn id(&self) -> ExtensionRequestId {
        self.id
    }

    /// Returns the task under review.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the requesting user.
    #[must_use]
    pub const fn requested_by(&self) -> UserId {
        self.requested_by
    }

    /// Returns the default approver, when the team had one.
    #[must_use]
    pub const fn requested_to(&self) -> Option<UserId> {
        self.requested_to
    }

    /// Returns the justification supplied by the requester.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the due date being asked for.
    #[must_use]
    pub const fn requested_due_date(&self) -> DateTime<Utc> {
        self.requested_due_date
    }

    /// Returns the decision state.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Returns who decided the request, once decided.
    #[must_use]
    pub const fn decided_by(&self) -> Option<UserId> {
        self.decided_by
    }

    /// Returns when the request was decided, once decided.
    #[must_use]
    pub const fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    /// Returns when the request was submitted.
    #[must_use]
    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Records a terminal decision. On approval the granted date is
    /// written back so the stored request matches what was applied.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RequestNotPending`] unless the request
    /// is currently pending.
    pub fn decide(
        &mut self,
        approver: UserId,
        approved: bool,
        granted_date: Option<DateTime<Utc>>,
        decided_at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if self.status != RequestStatus::Pending {
            return Err(TaskDomainError::RequestNotPending(self.status));
        }
        self.status = if approved {
            RequestStatus::Approved
        } else {
            RequestStatus::Rejected
        };
        if approved {
            if let Some(date) = granted_date {
                self.requested_due_date = date;
            }
        }
        self.decided_by = Some(approver);
        self.decided_at = Some(decided_at);
        Ok(())
    }
}

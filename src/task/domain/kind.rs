//! Task type and the type-approval gate applied to sensitive types.

use super::error::{ParseTaskTypeError, TaskDomainError};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional category of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    /// Routine work with no extra gate.
    Normal,
    /// Technical work; gated for unprivileged creators.
    Technical,
    /// Procurement work; gated and carries a stage pipeline.
    Procurement,
}

impl TaskType {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Technical => "Technical",
            Self::Procurement => "Procurement",
        }
    }

    /// Whether tasks of this type need type approval when created by an
    /// unprivileged user.
    #[must_use]
    pub const fn needs_type_approval(self) -> bool {
        matches!(self, Self::Technical | Self::Procurement)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskType {
    type Error = ParseTaskTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Normal" => Ok(Self::Normal),
            "Technical" => Ok(Self::Technical),
            "Procurement" => Ok(Self::Procurement),
            other => Err(ParseTaskTypeError(other.to_owned())),
        }
    }
}

/// Progress of a task through the type-approval gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeApprovalStatus {
    /// The creator's tier or the task type exempts the task.
    NotRequired,
    /// Awaiting a decision from a type approver.
    Pending,
    /// Approved; terminal.
    Approved,
    /// Rejected; terminal.
    Rejected,
}

impl TypeApprovalStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRequired => "not_required",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TypeApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-approval state carried by a task: the gate status plus the
/// decision record once one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeApproval {
    status: TypeApprovalStatus,
    decided_by: Option<UserId>,
    decided_at: Option<DateTime<Utc>>,
}

impl TypeApproval {
    /// Gate state for a task that needs no approval.
    #[must_use]
    pub const fn not_required() -> Self {
        Self {
            status: TypeApprovalStatus::NotRequired,
            decided_by: None,
            decided_at: None,
        }
    }

    /// Gate state for a task awaiting approval.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            status: TypeApprovalStatus::Pending,
            decided_by: None,
            decided_at: None,
        }
    }

    /// Returns the gate status.
    #[must_use]
    pub const fn status(&self) -> TypeApprovalStatus {
        self.status
    }

    /// Returns who decided the gate, once decided.
    #[must_use]
    pub const fn decided_by(&self) -> Option<UserId> {
        self.decided_by
    }

    /// Returns when the gate was decided, once decided.
    #[must_use]
    pub const fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    /// Records a terminal decision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TypeApprovalNotPending`] unless the gate
    /// is currently `pending`.
    pub fn decide(
        &mut self,
        approver: UserId,
        approved: bool,
        decided_at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if self.status != TypeApprovalStatus::Pending {
            return Err(TaskDomainError::TypeApprovalNotPending(self.status));
        }
        self.status = if approved {
            TypeApprovalStatus::Approved
        } else {
            TypeApprovalStatus::Rejected
        };
        self.decided_by = Some(approver);
        self.decided_at = Some(decided_at);
        Ok(())
    }
}

//! Multi-assignee support: per-user assignments with shares and a lead.

use super::error::TaskDomainError;
use crate::identity::domain::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workload share in whole percent, bounded to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentShare(u8);

impl PercentShare {
    /// Creates a validated share.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPercentShare`] when the value
    /// exceeds 100.
    pub const fn new(value: u8) -> Result<Self, TaskDomainError> {
        if value > 100 {
            return Err(TaskDomainError::InvalidPercentShare(value));
        }
        Ok(Self(value))
    }

    /// Returns the share as a plain integer.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PercentShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// One user's assignment to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAssignment {
    user_id: UserId,
    percent_share: Option<PercentShare>,
    is_lead: bool,
}

impl TaskAssignment {
    /// Creates an assignment.
    #[must_use]
    pub const fn new(user_id: UserId, percent_share: Option<PercentShare>, is_lead: bool) -> Self {
        Self {
            user_id,
            percent_share,
            is_lead,
        }
    }

    /// Returns the assigned user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the workload share, if recorded.
    #[must_use]
    pub const fn percent_share(&self) -> Option<PercentShare> {
        self.percent_share
    }

    /// Whether this assignee leads the task.
    #[must_use]
    pub const fn is_lead(&self) -> bool {
        self.is_lead
    }
}

/// Validates an assignment set: at most one lead.
///
/// # Errors
///
/// Returns [`TaskDomainError::MultipleLeads`] when more than one
/// assignment is marked as lead.
pub fn validate_assignments(assignments: &[TaskAssignment]) -> Result<(), TaskDomainError> {
    let leads = assignments.iter().filter(|a| a.is_lead()).count();
    if leads > 1 {
        return Err(TaskDomainError::MultipleLeads);
    }
    Ok(())
}

/// Picks the mirrored single assignee for an assignment set: the lead
/// when one is marked, otherwise the first assignment.
#[must_use]
pub fn mirrored_assignee(assignments: &[TaskAssignment]) -> Option<UserId> {
    assignments
        .iter()
        .find(|a| a.is_lead())
        .or_else(|| assignments.first())
        .map(TaskAssignment::user_id)
}

//! Audit trail entries recorded for governance actions.

use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditEntryId(Uuid);

impl AuditEntryId {
    /// Creates a new random audit entry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AuditEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AuditEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded governance action. Append-only; entries are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    id: AuditEntryId,
    actor: UserId,
    action: String,
    detail: String,
    recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Records a new audit entry.
    #[must_use]
    pub fn new(
        actor: UserId,
        action: impl Into<String>,
        detail: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            actor,
            action: action.into(),
            detail: detail.into(),
            recorded_at: clock.utc(),
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> AuditEntryId {
        self.id
    }

    /// Returns the user who performed the action.
    #[must_use]
    pub const fn actor(&self) -> UserId {
        self.actor
    }

    /// Returns the short action tag, e.g. `"task.approve"`.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the human-readable detail line.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns when the action was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

//! Per-task comment thread.

use super::TaskDomainError;
use super::ids::{CommentId, TaskId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A comment posted on a task by a team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    id: CommentId,
    task_id: TaskId,
    author: UserId,
    content: String,
    created_at: DateTime<Utc>,
}

impl TaskComment {
    /// Creates a comment on a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyComment`] when the trimmed content
    /// is empty.
    pub fn new(
        task_id: TaskId,
        author: UserId,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw = content.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyComment);
        }
        Ok(Self {
            id: CommentId::new(),
            task_id,
            author,
            content: normalized.to_owned(),
            created_at: clock.utc(),
        })
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the commented task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the comment text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//! Activity message stream: per-activity chat with system entries.

use super::{ActivityDomainError, ActivityId, MessageId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Authored by a user.
    User,
    /// Emitted by the engine; immutable.
    System,
}

impl MessageKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in an activity's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMessage {
    id: MessageId,
    activity_id: ActivityId,
    author: Option<UserId>,
    kind: MessageKind,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ActivityMessage {
    /// Creates a user-authored message.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityDomainError::EmptyMessage`] when the trimmed
    /// content is empty.
    pub fn user(
        activity_id: ActivityId,
        author: UserId,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ActivityDomainError> {
        let content = validated_content(content)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: MessageId::new(),
            activity_id,
            author: Some(author),
            kind: MessageKind::User,
            content,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Creates a system message. No author; never editable.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityDomainError::EmptyMessage`] when the trimmed
    /// content is empty.
    pub fn system(
        activity_id: ActivityId,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ActivityDomainError> {
        let content = validated_content(content)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: MessageId::new(),
            activity_id,
            author: None,
            kind: MessageKind::System,
            content,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the owning activity.
    #[must_use]
    pub const fn activity_id(&self) -> ActivityId {
        self.activity_id
    }

    /// Returns the author, absent for system messages.
    #[must_use]
    pub const fn author(&self) -> Option<UserId> {
        self.author
    }

    /// Returns the message kind.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last edit timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the content of a user message.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityDomainError::SystemMessageImmutable`] for system
    /// messages and [`ActivityDomainError::EmptyMessage`] for blank content.
    pub fn edit(
        &mut self,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), ActivityDomainError> {
        if self.kind == MessageKind::System {
            return Err(ActivityDomainError::SystemMessageImmutable);
        }
        self.content = validated_content(content)?;
        self.updated_at = clock.utc();
        Ok(())
    }
}

fn validated_content(content: impl Into<String>) -> Result<String, ActivityDomainError> {
    let raw = content.into();
    let normalized = raw.trim();
    if normalized.is_empty() {
        return Err(ActivityDomainError::EmptyMessage);
    }
    Ok(normalized.to_owned())
}

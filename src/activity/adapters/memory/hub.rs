//! In-memory activity store doubling as audit trail and notification
//! sink. Suitable for tests and single-process deployments.

use crate::activity::domain::{
    Activity, ActivityId, ActivityMessage, AuditEntry, MessageId,
};
use crate::activity::ports::{
    ActivityRepository, ActivityRepositoryError, AuditTrail, EventSinkError, MessageRepository,
    NotificationSink,
};
use crate::identity::domain::UserId;
use crate::team::domain::TeamId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct State {
    activities: HashMap<ActivityId, Activity>,
    // Insertion order doubles as creation order for message streams.
    messages: Vec<ActivityMessage>,
    audit_log: Vec<AuditEntry>,
    notices: Vec<(UserId, String)>,
}

/// Shared in-memory hub for activities, messages, audit, and notices.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityHub {
    state: Arc<RwLock<State>>,
}

impl InMemoryActivityHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded audit entry.
    #[must_use]
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.state
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .audit_log
            .clone()
    }

    /// Returns every delivered notice as `(recipient, text)` pairs.
    #[must_use]
    pub fn notices(&self) -> Vec<(UserId, String)> {
        self.state
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .notices
            .clone()
    }
}

fn lock_poisoned(err: impl Display) -> ActivityRepositoryError {
    ActivityRepositoryError::persistence(std::io::Error::other(format!("lock poisoned: {err}")))
}

fn sink_lock_poisoned(err: impl Display) -> EventSinkError {
    EventSinkError::new(std::io::Error::other(format!("lock poisoned: {err}")))
}

#[async_trait]
impl ActivityRepository for InMemoryActivityHub {
    async fn store(&self, activity: Activity) -> Result<(), ActivityRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.activities.contains_key(&activity.id()) {
            return Err(ActivityRepositoryError::DuplicateActivity(activity.id()));
        }
        state.activities.insert(activity.id(), activity);
        Ok(())
    }

    async fn find(&self, id: ActivityId) -> Result<Option<Activity>, ActivityRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.activities.get(&id).cloned())
    }

    async fn list_for_team(
        &self,
        team_id: TeamId,
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut found: Vec<Activity> = state
            .activities
            .values()
            .filter(|activity| activity.team_id() == team_id)
            .cloned()
            .collect();
        found.sort_by_key(Activity::created_at);
        Ok(found)
    }

    async fn delete(&self, id: ActivityId) -> Result<(), ActivityRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.activities.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for InMemoryActivityHub {
    async fn store_message(
        &self,
        message: ActivityMessage,
    ) -> Result<(), ActivityRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.messages.push(message);
        Ok(())
    }

    async fn update_message(
        &self,
        message: ActivityMessage,
    ) -> Result<(), ActivityRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let Some(slot) = state.messages.iter_mut().find(|m| m.id() == message.id()) else {
            return Err(ActivityRepositoryError::MessageNotFound(message.id()));
        };
        *slot = message;
        Ok(())
    }

    async fn find_message(
        &self,
        id: MessageId,
    ) -> Result<Option<ActivityMessage>, ActivityRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.messages.iter().find(|m| m.id() == id).cloned())
    }

    async fn messages_for(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<ActivityMessage>, ActivityRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .messages
            .iter()
            .filter(|m| m.activity_id() == activity_id)
            .cloned()
            .collect())
    }

    async fn delete_message(&self, id: MessageId) -> Result<(), ActivityRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.messages.retain(|m| m.id() != id);
        Ok(())
    }

    async fn delete_messages_for(
        &self,
        activity_id: ActivityId,
    ) -> Result<(), ActivityRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.messages.retain(|m| m.activity_id() != activity_id);
        Ok(())
    }
}

#[async_trait]
impl AuditTrail for InMemoryActivityHub {
    async fn record(&self, entry: AuditEntry) -> Result<(), EventSinkError> {
        let mut state = self.state.write().map_err(sink_lock_poisoned)?;
        state.audit_log.push(entry);
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for InMemoryActivityHub {
    async fn notify(&self, recipient: UserId, notice: &str) -> Result<(), EventSinkError> {
        let mut state = self.state.write().map_err(sink_lock_poisoned)?;
        state.notices.push((recipient, notice.to_owned()));
        Ok(())
    }
}

//! Persistence ports for activities and their message streams.

use crate::activity::domain::{Activity, ActivityId, ActivityMessage, MessageId};
use crate::team::domain::TeamId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by activity persistence adapters.
#[derive(Debug, Clone, Error)]
pub enum ActivityRepositoryError {
    /// An activity with the same identifier already exists.
    #[error("activity already exists: {0}")]
    DuplicateActivity(ActivityId),
    /// No activity matches the identifier.
    #[error("activity not found: {0}")]
    ActivityNotFound(ActivityId),
    /// No message matches the identifier.
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),
    /// Backend failure unrelated to domain rules.
    #[error("persistence failure: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ActivityRepositoryError {
    /// Wraps an arbitrary backend error as a persistence failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Storage for activity aggregates.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Persists a new activity.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityRepositoryError::DuplicateActivity`] when the
    /// identifier is already present.
    async fn store(&self, activity: Activity) -> Result<(), ActivityRepositoryError>;

    /// Fetches an activity by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityRepositoryError::Persistence`] on backend failure.
    async fn find(&self, id: ActivityId) -> Result<Option<Activity>, ActivityRepositoryError>;

    /// Lists all activities belonging to a team.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityRepositoryError::Persistence`] on backend failure.
    async fn list_for_team(&self, team_id: TeamId)
    -> Result<Vec<Activity>, ActivityRepositoryError>;

    /// Removes an activity. Succeeds when the activity is already absent.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityRepositoryError::Persistence`] on backend failure.
    async fn delete(&self, id: ActivityId) -> Result<(), ActivityRepositoryError>;
}

/// Storage for activity message streams.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Appends a message to its activity's stream.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityRepositoryError::Persistence`] on backend failure.
    async fn store_message(&self, message: ActivityMessage)
    -> Result<(), ActivityRepositoryError>;

    /// Replaces a stored message after an edit.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityRepositoryError::MessageNotFound`] when absent.
    async fn update_message(
        &self,
        message: ActivityMessage,
    ) -> Result<(), ActivityRepositoryError>;

    /// Fetches a single message.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityRepositoryError::Persistence`] on backend failure.
    async fn find_message(
        &self,
        id: MessageId,
    ) -> Result<Option<ActivityMessage>, ActivityRepositoryError>;

    /// Lists an activity's messages in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityRepositoryError::Persistence`] on backend failure.
    async fn messages_for(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<ActivityMessage>, ActivityRepositoryError>;

    /// Removes a single message. Succeeds when already absent.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityRepositoryError::Persistence`] on backend failure.
    async fn delete_message(&self, id: MessageId) -> Result<(), ActivityRepositoryError>;

    /// Removes every message belonging to an activity.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityRepositoryError::Persistence`] on backend failure.
    async fn delete_messages_for(
        &self,
        activity_id: ActivityId,
    ) -> Result<(), ActivityRepositoryError>;
}

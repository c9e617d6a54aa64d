//! Persistence ports for tasks and their review requests.

use crate::activity::domain::ActivityId;
use crate::identity::domain::UserId;
use crate::task::domain::{
    CompletionRequest, CompletionRequestId, ExtensionRequest, ExtensionRequestId, Task, TaskId,
    TaskComment,
};
use crate::team::domain::TeamId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by task persistence adapters.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("task already exists: {0}")]
    DuplicateTask(TaskId),
    /// No task matches the identifier.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// A pending completion request already exists for the task.
    #[error("task {0} already has a pending completion request")]
    PendingCompletionExists(TaskId),
    /// No completion request matches the identifier.
    #[error("completion request not found: {0}")]
    CompletionRequestNotFound(CompletionRequestId),
    /// No extension request matches the identifier.
    #[error("extension request not found: {0}")]
    ExtensionRequestNotFound(ExtensionRequestId),
    /// Backend failure unrelated to domain rules.
    #[error("persistence failure: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps an arbitrary backend error as a persistence failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Storage for task aggregates.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persists a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier
    /// is already present.
    async fn store(&self, task: Task) -> Result<(), TaskRepositoryError>;

    /// Replaces a stored task after a mutation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::TaskNotFound`] when absent.
    async fn update(&self, task: Task) -> Result<(), TaskRepositoryError>;

    /// Fetches a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn find(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError>;

    /// Lists tasks belonging to any of the given teams, in creation
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn list_for_teams(&self, teams: &[TeamId]) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Lists tasks belonging to an activity, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn list_for_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Lists tasks in a team where `user` appears as single assignee,
    /// for the unassignment cascade applied on member removal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn list_assigned_in_team(
        &self,
        team_id: TeamId,
        user: UserId,
    ) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Counts tasks belonging to a team.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn count_for_team(&self, team_id: TeamId) -> Result<usize, TaskRepositoryError>;

    /// Removes a task. Succeeds when the task is already absent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn delete(&self, id: TaskId) -> Result<(), TaskRepositoryError>;
}

/// Storage for completion requests.
///
/// Adapters enforce the one-pending-request-per-task invariant at the
/// storage boundary so racing submissions cannot both land.
#[async_trait]
pub trait CompletionRequestRepository: Send + Sync {
    /// Persists a new pending request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::PendingCompletionExists`] when the
    /// task already has a pending request.
    async fn store_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<(), TaskRepositoryError>;

    /// Replaces a stored request after a decision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::CompletionRequestNotFound`] when
    /// absent.
    async fn update_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<(), TaskRepositoryError>;

    /// Fetches a request by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn find_completion(
        &self,
        id: CompletionRequestId,
    ) -> Result<Option<CompletionRequest>, TaskRepositoryError>;

    /// Lists a task's completion requests in submission order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn completions_for_task(
        &self,
        task_id: TaskId,
    ) -> Result<Vec<CompletionRequest>, TaskRepositoryError>;

    /// Removes every completion request belonging to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn delete_completions_for(&self, task_id: TaskId) -> Result<(), TaskRepositoryError>;
}

/// Storage for extension requests.
#[async_trait]
pub trait ExtensionRequestRepository: Send + Sync {
    /// Persists a new pending request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn store_extension(&self, request: ExtensionRequest)
    -> Result<(), TaskRepositoryError>;

    /// Replaces a stored request after a decision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::ExtensionRequestNotFound`] when
    /// absent.
    async fn update_extension(
        &self,
        request: ExtensionRequest,
    ) -> Result<(), TaskRepositoryError>;

    /// Fetches a request by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn find_extension(
        &self,
        id: ExtensionRequestId,
    ) -> Result<Option<ExtensionRequest>, TaskRepositoryError>;

    /// Lists a task's extension requests in submission order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn extensions_for_task(
        &self,
        task_id: TaskId,
    ) -> Result<Vec<ExtensionRequest>, TaskRepositoryError>;

    /// Removes every extension request belonging to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn delete_extensions_for(&self, task_id: TaskId) -> Result<(), TaskRepositoryError>;
}

/// Storage for task comments.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persists a new comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn store_comment(&self, comment: TaskComment) -> Result<(), TaskRepositoryError>;

    /// Lists a task's comments in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn comments_for_task(
        &self,
        task_id: TaskId,
    ) -> Result<Vec<TaskComment>, TaskRepositoryError>;

    /// Removes every comment belonging to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] on backend failure.
    async fn delete_comments_for(&self, task_id: TaskId) -> Result<(), TaskRepositoryError>;
}

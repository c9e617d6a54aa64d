//! In-memory task store. Backs tests and single-process deployments.

use crate::activity::domain::ActivityId;
use crate::identity::domain::UserId;
use crate::task::domain::{
    CompletionRequest, CompletionRequestId, ExtensionRequest, ExtensionRequestId, RequestStatus,
    Task, TaskComment, TaskId,
};
use crate::task::ports::{
    CommentRepository, CompletionRequestRepository, ExtensionRequestRepository, TaskRepository,
    TaskRepositoryError,
};
use crate::team::domain::TeamId;
use async_trait::async_trait;
use std::fmt::Display;
use std::sync::{Arc, RwLock};

// Vecs rather than maps: insertion order is the creation-order contract
// the listing methods promise.
#[derive(Debug, Default)]
struct State {
    tasks: Vec<Task>,
    completions: Vec<CompletionRequest>,
    extensions: Vec<ExtensionRequest>,
    comments: Vec<TaskComment>,
}

/// Shared in-memory implementation of the task repositories.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(format!("lock poisoned: {err}")))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: Task) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.iter().any(|t| t.id() == task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.push(task);
        Ok(())
    }

    async fn update(&self, task: Task) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let Some(slot) = state.tasks.iter_mut().find(|t| t.id() == task.id()) else {
            return Err(TaskRepositoryError::TaskNotFound(task.id()));
        };
        *slot = task;
        Ok(())
    }

    async fn find(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.iter().find(|t| t.id() == id).cloned())
    }

    async fn list_for_teams(&self, teams: &[TeamId]) -> Result<Vec<Task>, TaskRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .tasks
            .iter()
            .filter(|t| teams.contains(&t.team_id()))
            .cloned()
            .collect())
    }

    async fn list_for_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.activity_id() == Some(activity_id))
            .cloned()
            .collect())
    }

    async fn list_assigned_in_team(
        &self,
        team_id: TeamId,
        user: UserId,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.team_id() == team_id && t.assigned_to() == Some(user))
            .cloned()
            .collect())
    }

    async fn count_for_team(&self, team_id: TeamId) -> Result<usize, TaskRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.iter().filter(|t| t.team_id() == team_id).count())
    }

    async fn delete(&self, id: TaskId) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.tasks.retain(|t| t.id() != id);
        Ok(())
    }
}

#[async_trait]
impl CompletionRequestRepository for InMemoryTaskRepository {
    async fn store_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let pending_exists = state
            .completions
            .iter()
            .any(|r| r.task_id() == request.task_id() && r.status() == RequestStatus::Pending);
        if pending_exists {
            return Err(TaskRepositoryError::PendingCompletionExists(
                request.task_id(),
            ));
        }
        state.completions.push(request);
        Ok(())
    }

    async fn update_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let Some(slot) = state.completions.iter_mut().find(|r| r.id() == request.id()) else {
            return Err(TaskRepositoryError::CompletionRequestNotFound(request.id()));
        };
        *slot = request;
        Ok(())
    }

    async fn find_completion(
        &self,
        id: CompletionRequestId,
    ) -> Result<Option<CompletionRequest>, TaskRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.completions.iter().find(|r| r.id() == id).cloned())
    }

    async fn completions_for_task(
        &self,
        task_id: TaskId,
    ) -> Result<Vec<CompletionRequest>, TaskRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .completions
            .iter()
            .filter(|r| r.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn delete_completions_for(&self, task_id: TaskId) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.completions.retain(|r| r.task_id() != task_id);
        Ok(())
    }
}

#[async_trait]
impl ExtensionRequestRepository for InMemoryTaskRepository {
    async fn store_extension(
        &self,
        request: ExtensionRequest,
    ) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.extensions.push(request);
        Ok(())
    }

    async fn update_extension(
        &self,
        request: ExtensionRequest,
    ) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let Some(slot) = state.extensions.iter_mut().find(|r| r.id() == request.id()) else {
            return Err(TaskRepositoryError::ExtensionRequestNotFound(request.id()));
        };
        *slot = request;
        Ok(())
    }

    async fn find_extension(
        &self,
        id: ExtensionRequestId,
    ) -> Result<Option<ExtensionRequest>, TaskRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.extensions.iter().find(|r| r.id() == id).cloned())
    }

    async fn extensions_for_task(
        &self,
        task_id: TaskId,
    ) -> Result<Vec<ExtensionRequest>, TaskRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .extensions
            .iter()
            .filter(|r| r.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn delete_extensions_for(&self, task_id: TaskId) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.extensions.retain(|r| r.task_id() != task_id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryTaskRepository {
    async fn store_comment(&self, comment: TaskComment) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.comments.push(comment);
        Ok(())
    }

    async fn comments_for_task(
        &self,
        task_id: TaskId,
    ) -> Result<Vec<TaskComment>, TaskRepositoryError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn delete_comments_for(&self, task_id: TaskId) -> Result<(), TaskRepositoryError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.comments.retain(|c| c.task_id() != task_id);
        Ok(())
    }
}

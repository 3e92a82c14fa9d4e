//! Manual completion entry point.
//!
//! Unlike the batch engines, manual completion is user-triggered and raises
//! descriptive errors so the caller can give actionable feedback.

use crate::engagement::{
    domain::{CompletedBy, EngagementDomainError, EngagementTask, TaskId, UserId},
    ports::{EngagementTaskRepository, EngagementTaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while manually completing a task.
#[derive(Debug, Error)]
pub enum ManualCompletionError {
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The task is already completed or its window has closed.
    #[error(transparent)]
    Domain(#[from] EngagementDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] EngagementTaskRepositoryError),
}

/// Result type for manual completion.
pub type ManualCompletionResult<T> = Result<T, ManualCompletionError>;

/// Completes tasks on behalf of a named user.
#[derive(Clone)]
pub struct ManualCompletionService<R, C>
where
    R: EngagementTaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ManualCompletionService<R, C>
where
    R: EngagementTaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new manual completion service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Completes the task, recording the acting user, and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`ManualCompletionError::NotFound`] when the task does not
    /// exist, [`ManualCompletionError::Domain`] when it is already
    /// completed or expired, or [`ManualCompletionError::Repository`] when
    /// the update fails to persist.
    pub async fn complete(
        &self,
        task_id: TaskId,
        user_id: UserId,
    ) -> ManualCompletionResult<EngagementTask> {
        let Some(mut task) = self.repository.find_by_id(task_id).await? else {
            return Err(ManualCompletionError::NotFound(task_id));
        };

        if task.is_expired(self.clock.utc().date_naive()) {
            return Err(EngagementDomainError::TaskExpired(task_id).into());
        }
        task.complete(CompletedBy::User { user_id }, &*self.clock)?;
        self.repository.update(&task).await?;
        info!(task = %task.id(), user = %user_id, "task completed manually");
        Ok(task)
    }
}

//! Repository port for engagement task history and persistence.

use crate::engagement::domain::{EngagementTask, PatientId, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for engagement task repository operations.
pub type EngagementTaskRepositoryResult<T> = Result<T, EngagementTaskRepositoryError>;

/// Engagement task persistence contract.
///
/// History is append-only from this engine's perspective: rows are added or
/// updated, never deleted.
#[async_trait]
pub trait EngagementTaskRepository: Send + Sync {
    /// Stores a new task row.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementTaskRepositoryError::DuplicateTask`] when the
    /// task ID already exists.
    async fn add(&self, task: &EngagementTask) -> EngagementTaskRepositoryResult<()>;

    /// Persists changes to an existing task (status, completion,
    /// timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`EngagementTaskRepositoryError::NotFound`] when the task
    /// does not exist.
    async fn update(&self, task: &EngagementTask) -> EngagementTaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> EngagementTaskRepositoryResult<Option<EngagementTask>>;

    /// Returns the full history for one patient, in no particular order.
    async fn for_patient(
        &self,
        patient_id: PatientId,
    ) -> EngagementTaskRepositoryResult<Vec<EngagementTask>>;

    /// Returns the full history for the given patients, in no particular
    /// order.
    async fn for_patients(
        &self,
        patient_ids: &[PatientId],
    ) -> EngagementTaskRepositoryResult<Vec<EngagementTask>>;
}

/// Errors returned by engagement task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum EngagementTaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EngagementTaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

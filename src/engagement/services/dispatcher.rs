//! Progression and notification dispatch for pending tasks.
//!
//! Promotion and channel fan-out are computed first and persisted second;
//! the returned notification requests are handed to the external transport
//! by the caller, after the status update has been stored.

use crate::engagement::{
    domain::{ChannelFlags, CriteriaId, EngagementTask, PatientId, PatientUniversalId, TaskId},
    ports::{EngagementTaskRepository, EngagementTaskRepositoryError},
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Outbound channel for one notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    /// SMS message.
    Sms,
    /// Email message.
    Email,
}

/// Request for the external notification transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Channel to deliver on.
    pub channel: NotificationChannel,
    /// Internal patient identifier.
    pub patient_id: PatientId,
    /// Cross-system identifier the transport routes by.
    pub patient_universal_id: PatientUniversalId,
    /// Criteria the task was admitted for.
    pub criteria_id: CriteriaId,
    /// Display title for message templating.
    pub title: String,
}

impl NotificationRequest {
    fn for_task(task: &EngagementTask, channel: NotificationChannel) -> Self {
        Self {
            channel,
            patient_id: task.patient_id(),
            patient_universal_id: task.patient_universal_id(),
            criteria_id: task.criteria().id(),
            title: task.criteria().display().title().to_owned(),
        }
    }
}

/// Result of dispatching one task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The promoted task, when the guard admitted it.
    pub promoted: Option<EngagementTask>,
    /// Channel notifications to send. SMS and email fire independently and
    /// may both be present for one task.
    pub notifications: Vec<NotificationRequest>,
}

impl DispatchOutcome {
    /// Returns `true` when the dispatch changed nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.promoted.is_none()
    }
}

/// Errors raised while dispatching a task.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] EngagementTaskRepositoryError),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Promotes pending tasks to in-progress and fans out channel
/// notifications.
#[derive(Clone)]
pub struct NotificationDispatcher<R, C>
where
    R: EngagementTaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> NotificationDispatcher<R, C>
where
    R: EngagementTaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new dispatcher.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Dispatches one task by identifier.
    ///
    /// Only an unexpired pending task is acted on: it is promoted to
    /// in-progress, persisted, and its SMS/email channel bits are each
    /// tested independently to build the notification requests. Everything
    /// else (already in progress, completed, expired) is an idempotent
    /// no-op with an empty outcome, so re-invocation never duplicates
    /// notifications.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotFound`] when the task does not exist, or
    /// [`DispatchError::Repository`] when the promotion fails to persist.
    pub async fn dispatch(&self, task_id: TaskId) -> DispatchResult<DispatchOutcome> {
        let Some(mut task) = self.repository.find_by_id(task_id).await? else {
            return Err(DispatchError::NotFound(task_id));
        };

        if !task.begin_progress(&*self.clock) {
            debug!(
                task = %task.id(),
                status = task.status().as_str(),
                "dispatch skipped: task not pending or expired"
            );
            return Ok(DispatchOutcome::default());
        }
        self.repository.update(&task).await?;

        let channels = task.criteria().channels();
        let mut notifications = Vec::new();
        if channels.intersects(ChannelFlags::SMS) {
            notifications.push(NotificationRequest::for_task(&task, NotificationChannel::Sms));
        }
        if channels.intersects(ChannelFlags::EMAIL) {
            notifications.push(NotificationRequest::for_task(
                &task,
                NotificationChannel::Email,
            ));
        }
        info!(
            task = %task.id(),
            patient = %task.patient_id(),
            notifications = notifications.len(),
            "task promoted to in-progress"
        );

        Ok(DispatchOutcome {
            promoted: Some(task),
            notifications,
        })
    }
}

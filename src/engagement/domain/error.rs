//! Error types for engagement domain validation and lifecycle guards.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating engagement domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngagementDomainError {
    /// The criteria display title is empty after trimming.
    #[error("criteria title must not be empty")]
    EmptyCriteriaTitle,

    /// The analytics tag is empty after trimming.
    #[error("analytics tag must not be empty")]
    EmptyAnalyticsTag,

    /// The task is already in a completed state.
    #[error("task {0} is already completed")]
    AlreadyCompleted(TaskId),

    /// The task's engagement window has closed.
    #[error("task {0} has expired")]
    TaskExpired(TaskId),

    /// Only completed tasks can be reopened.
    #[error("task {0} is not completed and cannot be reopened")]
    NotCompleted(TaskId),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing criteria types from persistence or
/// configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown criteria type: {0}")]
pub struct ParseCriteriaTypeError(pub String);

//! Domain model for patient engagement qualification and lifecycle.
//!
//! The engagement domain models criteria definitions, scanner candidates,
//! and the task aggregate with its pending/in-progress/completed lifecycle,
//! keeping all infrastructure concerns outside of the domain boundary.
//! Expiry is a derived property of a task's fixed window, orthogonal to its
//! status.

mod candidate;
mod criteria;
mod error;
mod flags;
mod ids;
mod task;

pub use candidate::Candidate;
pub use criteria::{
    AnalyticsTag, CriteriaDisplay, CriteriaType, EngagementCriteria, EngagementPeriod,
    RepeatPolicy,
};
pub use error::{EngagementDomainError, ParseCriteriaTypeError, ParseTaskStatusError};
pub use flags::{AssigneeFlags, ChannelFlags};
pub use ids::{CriteriaId, PatientId, PatientUniversalId, TaskId, UserId};
pub use task::{CompletedBy, EngagementTask, Expiration, PersistedTaskData, TaskStatus};

//! Port contracts for the engagement engine's external collaborators.

mod eligibility;
mod repository;

pub use eligibility::{EligibilityError, EligibilityResult, NotificationEligibility};
pub use repository::{
    EngagementTaskRepository, EngagementTaskRepositoryError, EngagementTaskRepositoryResult,
};

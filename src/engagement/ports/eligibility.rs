//! Port for the external notification eligibility oracle.

use crate::engagement::domain::PatientUniversalId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for eligibility oracle lookups.
pub type EligibilityResult<T> = Result<T, EligibilityError>;

/// External oracle answering whether SMS/email outreach may be sent to a
/// patient.
///
/// Dashboard-only candidates never consult the oracle; the qualification
/// engine asks at most once per patient-track SMS/email candidate.
#[async_trait]
pub trait NotificationEligibility: Send + Sync {
    /// Returns `true` when the patient may receive SMS/email outreach.
    ///
    /// # Errors
    ///
    /// Returns [`EligibilityError`] when the oracle backend fails; the
    /// engine propagates this to the caller rather than guessing.
    async fn is_eligible(&self, patient: PatientUniversalId) -> EligibilityResult<bool>;
}

/// Failure reaching or querying the eligibility oracle.
#[derive(Debug, Clone, Error)]
#[error("eligibility oracle failure: {0}")]
pub struct EligibilityError(Arc<dyn std::error::Error + Send + Sync>);

impl EligibilityError {
    /// Wraps an oracle backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}

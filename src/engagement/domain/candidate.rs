//! Ephemeral scanner output: one provisional (patient, criteria) match.

use super::{EngagementCriteria, PatientId, PatientUniversalId};
use serde::{Deserialize, Serialize};

/// A (patient, criteria) pair provisionally qualifying for engagement this
/// cycle. Candidates are not persisted by the engine; surviving ones are
/// materialized into [`super::EngagementTask`] rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    patient_id: PatientId,
    patient_universal_id: PatientUniversalId,
    criteria: EngagementCriteria,
    is_premium: bool,
}

impl Candidate {
    /// Creates a candidate from scanner output.
    #[must_use]
    pub const fn new(
        patient_id: PatientId,
        patient_universal_id: PatientUniversalId,
        criteria: EngagementCriteria,
        is_premium: bool,
    ) -> Self {
        Self {
            patient_id,
            patient_universal_id,
            criteria,
            is_premium,
        }
    }

    /// Returns the internal patient identifier.
    #[must_use]
    pub const fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    /// Returns the cross-system patient identifier.
    #[must_use]
    pub const fn patient_universal_id(&self) -> PatientUniversalId {
        self.patient_universal_id
    }

    /// Returns the criteria that matched.
    #[must_use]
    pub const fn criteria(&self) -> &EngagementCriteria {
        &self.criteria
    }

    /// Returns `true` for premium-programme patients.
    #[must_use]
    pub const fn is_premium(&self) -> bool {
        self.is_premium
    }
}

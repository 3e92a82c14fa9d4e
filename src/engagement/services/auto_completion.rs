//! Appointment-driven auto-completion of active engagement tasks.
//!
//! Which criteria types an appointment credits is clinical policy that
//! changes independently of code releases, so the classification table is
//! loaded as configuration data with a built-in default.

use crate::engagement::{
    domain::{CompletedBy, CriteriaType, EngagementTask, PatientId},
    ports::{EngagementTaskRepository, EngagementTaskRepositoryError},
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Type of appointment reported by the scheduling system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    /// Visit with the provider.
    Provider,
    /// Visit with a health coach.
    HealthCoach,
    /// Combined visit; credits the provider table.
    HealthCoachAndProvider,
}

/// Criteria-type credit table: which criteria each visit kind completes.
///
/// The two sets may overlap: some criteria credit either visit type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitCreditConfig {
    provider_credited: HashSet<CriteriaType>,
    health_coach_credited: HashSet<CriteriaType>,
}

impl VisitCreditConfig {
    /// Creates a credit table from explicit sets.
    #[must_use]
    pub const fn new(
        provider_credited: HashSet<CriteriaType>,
        health_coach_credited: HashSet<CriteriaType>,
    ) -> Self {
        Self {
            provider_credited,
            health_coach_credited,
        }
    }

    /// Loads a credit table from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns the underlying deserialization error when the document does
    /// not match the expected shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the set credited by the given appointment type.
    #[must_use]
    pub const fn credited_by(&self, appointment: AppointmentType) -> &HashSet<CriteriaType> {
        match appointment {
            AppointmentType::Provider | AppointmentType::HealthCoachAndProvider => {
                &self.provider_credited
            }
            AppointmentType::HealthCoach => &self.health_coach_credited,
        }
    }
}

impl Default for VisitCreditConfig {
    /// Built-in clinical defaults. Lab and medication reviews credit either
    /// visit type.
    fn default() -> Self {
        Self {
            provider_credited: HashSet::from([
                CriteriaType::AnnualWellnessVisit,
                CriteriaType::ProviderFollowUp,
                CriteriaType::LabResultsReview,
                CriteriaType::MedicationReview,
                CriteriaType::PreventiveScreening,
            ]),
            health_coach_credited: HashSet::from([
                CriteriaType::HealthCoachIntro,
                CriteriaType::NutritionCheckIn,
                CriteriaType::CarePlanReview,
                CriteriaType::LabResultsReview,
                CriteriaType::MedicationReview,
            ]),
        }
    }
}

/// Errors raised while crediting an appointment.
#[derive(Debug, Error)]
pub enum AutoCompletionError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] EngagementTaskRepositoryError),
}

/// Result type for auto-completion operations.
pub type AutoCompletionResult<T> = Result<T, AutoCompletionError>;

/// Closes a patient's active tasks when a matching appointment occurs.
#[derive(Clone)]
pub struct AutoCompletionEngine<R, C>
where
    R: EngagementTaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    credits: VisitCreditConfig,
}

impl<R, C> AutoCompletionEngine<R, C>
where
    R: EngagementTaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates an auto-completion engine with the given credit table.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, credits: VisitCreditConfig) -> Self {
        Self {
            repository,
            clock,
            credits,
        }
    }

    /// Completes the patient's active, unexpired tasks whose criteria type
    /// the appointment credits. Non-matching tasks are left untouched; that
    /// is an explicit no-op, not an error.
    ///
    /// Returns the tasks that were completed and persisted.
    ///
    /// # Errors
    ///
    /// Returns [`AutoCompletionError::Repository`] when history cannot be
    /// read or an update fails to persist.
    pub async fn credit_appointment(
        &self,
        patient_id: PatientId,
        appointment: AppointmentType,
    ) -> AutoCompletionResult<Vec<EngagementTask>> {
        let today = self.clock.utc().date_naive();
        let credited = self.credits.credited_by(appointment);

        let mut completed = Vec::new();
        for row in self.repository.for_patient(patient_id).await? {
            if !row.is_actionable(today) || !credited.contains(&row.criteria().criteria_type()) {
                continue;
            }
            let mut task = row;
            if let Ok(()) = task.complete(CompletedBy::System, &*self.clock) {
                self.repository.update(&task).await?;
                info!(
                    patient = %task.patient_id(),
                    criteria = %task.criteria().id(),
                    criteria_type = %task.criteria().criteria_type(),
                    ?appointment,
                    "task auto-completed by appointment"
                );
                completed.push(task);
            }
        }
        Ok(completed)
    }
}

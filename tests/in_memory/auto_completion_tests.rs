//! Integration tests for appointment-driven auto-completion.

use super::helpers::{
    CountingOracle, FixedClock, candidate, clock, dashboard_criteria, repo, sms_criteria,
};
use outreach::engagement::{
    adapters::memory::InMemoryEngagementTaskRepository,
    domain::{CompletedBy, CriteriaType, PatientId, PatientUniversalId, TaskStatus},
    ports::EngagementTaskRepository,
    services::{AppointmentType, AutoCompletionEngine, QualificationEngine, VisitCreditConfig},
};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provider_appointment_closes_credited_tasks_and_spares_the_rest(
    repo: Arc<InMemoryEngagementTaskRepository>,
    clock: Arc<FixedClock>,
) {
    let oracle = Arc::new(CountingOracle::answering(true));
    let qualification = QualificationEngine::new(
        Arc::clone(&repo),
        Arc::clone(&oracle),
        Arc::clone(&clock),
    );
    let credited_patient = PatientId::new();
    let spared_patient = PatientId::new();

    let outcome = qualification
        .run_cycle(vec![
            candidate(
                credited_patient,
                PatientUniversalId::new(),
                sms_criteria(CriteriaType::AnnualWellnessVisit, 1),
            ),
            candidate(
                spared_patient,
                PatientUniversalId::new(),
                dashboard_criteria(CriteriaType::HealthCoachIntro),
            ),
        ])
        .await
        .expect("cycle should succeed");
    qualification.commit(outcome).await.expect("commit");

    let auto_completion = AutoCompletionEngine::new(
        Arc::clone(&repo),
        Arc::clone(&clock),
        VisitCreditConfig::default(),
    );
    let completed = auto_completion
        .credit_appointment(credited_patient, AppointmentType::Provider)
        .await
        .expect("credit should succeed");

    assert_eq!(completed.len(), 1);
    assert_eq!(
        completed.first().map(|task| task.completed_by()),
        Some(Some(CompletedBy::System))
    );

    // The other patient's health-coach task is untouched by this visit.
    let spared = repo.for_patient(spared_patient).await.expect("history");
    assert_eq!(
        spared.first().map(|task| task.status()),
        Some(TaskStatus::InProgress)
    );
}

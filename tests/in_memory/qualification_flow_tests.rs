//! End-to-end qualification flows over the in-memory adapters.

use super::helpers::{
    CountingOracle, FixedClock, candidate, clock, dashboard_criteria, now, repo, sms_criteria,
};
use outreach::engagement::{
    adapters::memory::InMemoryEngagementTaskRepository,
    domain::{CriteriaType, PatientId, PatientUniversalId, TaskStatus, UserId},
    ports::EngagementTaskRepository,
    services::{ManualCompletionService, QualificationEngine},
};
use rstest::rstest;
use std::sync::Arc;

fn engine(
    repo: &Arc<InMemoryEngagementTaskRepository>,
    oracle: &Arc<CountingOracle>,
    clock: &Arc<FixedClock>,
) -> QualificationEngine<InMemoryEngagementTaskRepository, CountingOracle, FixedClock> {
    QualificationEngine::new(Arc::clone(repo), Arc::clone(oracle), Arc::clone(clock))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admitted_candidates_are_persisted_with_their_channel_derived_status(
    repo: Arc<InMemoryEngagementTaskRepository>,
    clock: Arc<FixedClock>,
) {
    let oracle = Arc::new(CountingOracle::answering(true));
    let service = engine(&repo, &oracle, &clock);
    let sms_patient = PatientId::new();
    let dashboard_patient = PatientId::new();

    let outcome = service
        .run_cycle(vec![
            candidate(
                sms_patient,
                PatientUniversalId::new(),
                sms_criteria(CriteriaType::AnnualWellnessVisit, 1),
            ),
            candidate(
                dashboard_patient,
                PatientUniversalId::new(),
                dashboard_criteria(CriteriaType::CarePlanReview),
            ),
        ])
        .await
        .expect("cycle should succeed");
    service.commit(outcome).await.expect("commit should succeed");

    assert_eq!(oracle.calls(), 1);
    let sms_history = repo.for_patient(sms_patient).await.expect("history");
    assert_eq!(
        sms_history.first().map(|task| task.status()),
        Some(TaskStatus::PendingAction)
    );
    let dashboard_history = repo.for_patient(dashboard_patient).await.expect("history");
    assert_eq!(
        dashboard_history.first().map(|task| task.status()),
        Some(TaskStatus::InProgress)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ineligible_patients_are_silently_excluded(
    repo: Arc<InMemoryEngagementTaskRepository>,
    clock: Arc<FixedClock>,
) {
    let oracle = Arc::new(CountingOracle::answering(false));
    let service = engine(&repo, &oracle, &clock);
    let patient = PatientId::new();

    let outcome = service
        .run_cycle(vec![candidate(
            patient,
            PatientUniversalId::new(),
            sms_criteria(CriteriaType::AnnualWellnessVisit, 1),
        )])
        .await
        .expect("cycle should succeed");
    let events = service.commit(outcome).await.expect("commit should succeed");

    assert_eq!(oracle.calls(), 1);
    assert!(repo.for_patient(patient).await.expect("history").is_empty());
    // The cycle marker is still published for an empty cycle.
    assert_eq!(events.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_task_is_resurrected_when_its_trigger_recurs(
    repo: Arc<InMemoryEngagementTaskRepository>,
    clock: Arc<FixedClock>,
) {
    let oracle = Arc::new(CountingOracle::answering(true));
    let service = engine(&repo, &oracle, &clock);
    let patient = PatientId::new();
    let universal = PatientUniversalId::new();
    let rule = dashboard_criteria(CriteriaType::CarePlanReview);

    let first = service
        .run_cycle(vec![candidate(patient, universal, rule.clone())])
        .await
        .expect("first cycle");
    service.commit(first).await.expect("first commit");

    let task_id = repo
        .for_patient(patient)
        .await
        .expect("history")
        .first()
        .map(outreach::engagement::domain::EngagementTask::id)
        .expect("admitted task");
    ManualCompletionService::new(Arc::clone(&repo), Arc::clone(&clock))
        .complete(task_id, UserId::new())
        .await
        .expect("manual completion");

    // The trigger condition recurs before the 14-day window closes.
    let second = service
        .run_cycle(vec![candidate(patient, universal, rule)])
        .await
        .expect("second cycle");

    assert!(second.added().is_empty());
    assert_eq!(second.updated().len(), 1);
    service.commit(second).await.expect("second commit");

    let history = repo.for_patient(patient).await.expect("history");
    assert_eq!(history.len(), 1);
    let task = history.first().expect("task present");
    assert_eq!(task.id(), task_id);
    assert_eq!(task.status(), TaskStatus::InProgress);
    assert!(task.completed_by().is_none());
    assert_eq!(task.modified_at(), now());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn committed_cycles_are_idempotent_across_reruns(
    repo: Arc<InMemoryEngagementTaskRepository>,
    clock: Arc<FixedClock>,
) {
    let oracle = Arc::new(CountingOracle::answering(true));
    let service = engine(&repo, &oracle, &clock);
    let patient = PatientId::new();
    let universal = PatientUniversalId::new();
    let rule = sms_criteria(CriteriaType::AnnualWellnessVisit, 1);

    let first = service
        .run_cycle(vec![candidate(patient, universal, rule.clone())])
        .await
        .expect("first cycle");
    service.commit(first).await.expect("first commit");

    let second = service
        .run_cycle(vec![candidate(patient, universal, rule)])
        .await
        .expect("second cycle");

    assert!(second.actions.is_empty());
    assert_eq!(repo.for_patient(patient).await.expect("history").len(), 1);
}

//! Integration tests for promotion and notification fan-out.

use super::helpers::{
    CountingOracle, FixedClock, candidate, clock, repo, sms_criteria,
};
use outreach::engagement::{
    adapters::memory::InMemoryEngagementTaskRepository,
    domain::{CriteriaType, PatientId, PatientUniversalId, TaskStatus},
    ports::EngagementTaskRepository,
    services::{NotificationChannel, NotificationDispatcher, QualificationEngine},
};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admitted_pending_task_is_promoted_and_notified_exactly_once(
    repo: Arc<InMemoryEngagementTaskRepository>,
    clock: Arc<FixedClock>,
) {
    let oracle = Arc::new(CountingOracle::answering(true));
    let qualification = QualificationEngine::new(
        Arc::clone(&repo),
        Arc::clone(&oracle),
        Arc::clone(&clock),
    );
    let patient = PatientId::new();

    let outcome = qualification
        .run_cycle(vec![candidate(
            patient,
            PatientUniversalId::new(),
            sms_criteria(CriteriaType::AnnualWellnessVisit, 1),
        )])
        .await
        .expect("cycle should succeed");
    qualification.commit(outcome).await.expect("commit");

    let task_id = repo
        .for_patient(patient)
        .await
        .expect("history")
        .first()
        .map(outreach::engagement::domain::EngagementTask::id)
        .expect("admitted task");

    let dispatcher = NotificationDispatcher::new(Arc::clone(&repo), Arc::clone(&clock));
    let first = dispatcher.dispatch(task_id).await.expect("first dispatch");
    assert_eq!(
        first
            .notifications
            .iter()
            .map(|request| request.channel)
            .collect::<Vec<_>>(),
        vec![NotificationChannel::Sms]
    );
    assert_eq!(
        first.promoted.map(|task| task.status()),
        Some(TaskStatus::InProgress)
    );

    // Re-invocation after promotion never duplicates notifications.
    let second = dispatcher.dispatch(task_id).await.expect("second dispatch");
    assert!(second.is_noop());
    assert!(second.notifications.is_empty());
}

//! Shared fixtures for in-memory integration tests.

use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use outreach::engagement::{
    adapters::memory::InMemoryEngagementTaskRepository,
    domain::{
        AssigneeFlags, Candidate, ChannelFlags, CriteriaDisplay, CriteriaId, CriteriaType,
        EngagementCriteria, EngagementPeriod, PatientId, PatientUniversalId, RepeatPolicy,
    },
    ports::{EligibilityResult, NotificationEligibility},
};
use rstest::fixture;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A fixed "now" shared across the integration tests.
pub fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-28T10:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// Provides a clock pinned to [`now`].
#[fixture]
pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(now()))
}

/// Provides a fresh in-memory repository for each test.
#[fixture]
pub fn repo() -> Arc<InMemoryEngagementTaskRepository> {
    Arc::new(InMemoryEngagementTaskRepository::new())
}

/// Eligibility oracle answering a fixed value and counting its calls.
#[derive(Debug, Default)]
pub struct CountingOracle {
    answer: bool,
    calls: AtomicUsize,
}

impl CountingOracle {
    /// Creates an oracle always answering `answer`.
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the oracle was consulted.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NotificationEligibility for CountingOracle {
    async fn is_eligible(&self, _patient: PatientUniversalId) -> EligibilityResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

/// Patient-track SMS criteria with a 30-day repeat lock and 14-day window.
pub fn sms_criteria(criteria_type: CriteriaType, priority: u32) -> EngagementCriteria {
    EngagementCriteria::new(
        CriteriaId::new(),
        criteria_type,
        AssigneeFlags::PATIENT,
        ChannelFlags::DASHBOARD | ChannelFlags::SMS,
        priority,
        RepeatPolicy::AfterDays { days: 30 },
        EngagementPeriod::Days { days: 14 },
        CriteriaDisplay::new("Schedule your visit").expect("valid title"),
    )
}

/// Patient-track dashboard-only criteria.
pub fn dashboard_criteria(criteria_type: CriteriaType) -> EngagementCriteria {
    EngagementCriteria::new(
        CriteriaId::new(),
        criteria_type,
        AssigneeFlags::PATIENT,
        ChannelFlags::DASHBOARD,
        10,
        RepeatPolicy::AfterDays { days: 30 },
        EngagementPeriod::Days { days: 14 },
        CriteriaDisplay::new("Review your care plan").expect("valid title"),
    )
}

/// Builds a candidate for the given patient and criteria.
pub fn candidate(
    patient_id: PatientId,
    universal_id: PatientUniversalId,
    criteria: EngagementCriteria,
) -> Candidate {
    Candidate::new(patient_id, universal_id, criteria, false)
}

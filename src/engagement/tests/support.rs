//! Shared builders and a fixed clock for deterministic lifecycle tests.

use crate::engagement::domain::{
    AssigneeFlags, Candidate, ChannelFlags, CompletedBy, CriteriaDisplay, CriteriaId, CriteriaType,
    EngagementCriteria, EngagementPeriod, EngagementTask, Expiration, PatientId,
    PatientUniversalId, PersistedTaskData, RepeatPolicy, TaskId, TaskStatus,
};
use chrono::{DateTime, Days, Local, Utc};
use mockable::Clock;

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

/// A fixed "now" shared across the lifecycle tests.
pub fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-28T10:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// Clock pinned to [`now`].
pub fn clock() -> FixedClock {
    FixedClock(now())
}

/// Patient-track criteria delivered over SMS and the dashboard.
pub fn patient_criteria(criteria_type: CriteriaType, priority: u32) -> EngagementCriteria {
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

/// Patient-track criteria shown on the dashboard only.
pub fn dashboard_only_criteria(criteria_type: CriteriaType, priority: u32) -> EngagementCriteria {
    EngagementCriteria::new(
        CriteriaId::new(),
        criteria_type,
        AssigneeFlags::PATIENT,
        ChannelFlags::DASHBOARD,
        priority,
        RepeatPolicy::AfterDays { days: 30 },
        EngagementPeriod::Days { days: 14 },
        CriteriaDisplay::new("Review your care plan").expect("valid title"),
    )
}

/// Care-coordinator-track criteria delivered over the dashboard.
pub fn coordinator_criteria(criteria_type: CriteriaType) -> EngagementCriteria {
    EngagementCriteria::new(
        CriteriaId::new(),
        criteria_type,
        AssigneeFlags::CARE_COORDINATOR,
        ChannelFlags::DASHBOARD,
        5,
        RepeatPolicy::AfterDays { days: 7 },
        EngagementPeriod::Days { days: 30 },
        CriteriaDisplay::new("Coordinate patient follow-up").expect("valid title"),
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

/// Builds a persisted history row created `age_days` ago.
///
/// The expiration is recomputed from the criteria period relative to the
/// backdated creation date, so a row older than its window is expired.
pub fn history_task(
    patient_id: PatientId,
    universal_id: PatientUniversalId,
    criteria: EngagementCriteria,
    status: TaskStatus,
    age_days: u64,
) -> EngagementTask {
    let created_at = now() - chrono::Duration::days(i64::try_from(age_days).expect("small age"));
    let expiration = match criteria.period() {
        EngagementPeriod::Never => Expiration::Never,
        EngagementPeriod::Days { days } => Expiration::On {
            date: created_at
                .date_naive()
                .checked_add_days(Days::new(u64::from(days)))
                .expect("valid expiry date"),
        },
    };
    let completed_by = (status == TaskStatus::Completed).then_some(CompletedBy::System);
    EngagementTask::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        patient_id,
        patient_universal_id: universal_id,
        criteria,
        status,
        is_premium: false,
        created_at,
        expiration,
        modified_at: created_at,
        completed_by,
    })
}

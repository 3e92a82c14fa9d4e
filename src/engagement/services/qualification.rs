//! Cycle qualification: admission filtering, dedup, resurrection, and event
//! emission.
//!
//! The core is a pure function over an immutable [`CycleSnapshot`]; the
//! [`QualificationEngine`] service gathers the snapshot through ports,
//! invokes the core, and applies the returned actions in an explicit commit
//! step. Rejections are normal control flow and are logged, never raised.

use crate::engagement::{
    domain::{
        AnalyticsTag, AssigneeFlags, Candidate, CriteriaId, EngagementTask, PatientId,
        PatientUniversalId, TaskStatus,
    },
    ports::{
        EligibilityError, EngagementTaskRepository, EngagementTaskRepositoryError,
        NotificationEligibility,
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// One intended mutation of the engagement history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Insert a newly admitted task row.
    Add(EngagementTask),
    /// Persist changes to an existing row (resurrection).
    Update(EngagementTask),
}

/// Event to publish after the cycle's actions have been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngagementEvent {
    /// Analytics marker for one newly admitted candidate carrying a tag.
    Analytics {
        /// Patient the admission concerns.
        patient_id: PatientId,
        /// Criteria that was admitted.
        criteria_id: CriteriaId,
        /// The criteria's analytics tag.
        tag: AnalyticsTag,
    },
    /// Cycle marker, emitted exactly once per cycle.
    CycleCompleted {
        /// When the cycle ran.
        completed_at: DateTime<Utc>,
        /// Number of newly admitted tasks.
        admitted: usize,
        /// Number of resurrected tasks.
        resurrected: usize,
    },
}

/// Result of one qualification cycle: intended mutations plus events.
///
/// The caller owns the commit step: persist all actions atomically, then
/// publish the events. Nothing here has touched storage yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Ordered mutations: admissions first, resurrections after.
    pub actions: Vec<TaskAction>,
    /// Ordered events: one analytics event per tagged admission, then the
    /// cycle marker.
    pub events: Vec<EngagementEvent>,
}

impl CycleOutcome {
    /// Returns the newly admitted tasks.
    #[must_use]
    pub fn added(&self) -> Vec<&EngagementTask> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                TaskAction::Add(task) => Some(task),
                TaskAction::Update(_) => None,
            })
            .collect()
    }

    /// Returns the resurrected tasks.
    #[must_use]
    pub fn updated(&self) -> Vec<&EngagementTask> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                TaskAction::Update(task) => Some(task),
                TaskAction::Add(_) => None,
            })
            .collect()
    }
}

/// Immutable inputs of one qualification cycle.
#[derive(Debug, Clone)]
pub struct CycleSnapshot {
    candidates: Vec<Candidate>,
    history: Vec<EngagementTask>,
    eligibility: HashMap<PatientUniversalId, bool>,
    today: NaiveDate,
}

impl CycleSnapshot {
    /// Assembles a snapshot from pre-fetched inputs.
    #[must_use]
    pub const fn new(
        candidates: Vec<Candidate>,
        history: Vec<EngagementTask>,
        eligibility: HashMap<PatientUniversalId, bool>,
        today: NaiveDate,
    ) -> Self {
        Self {
            candidates,
            history,
            eligibility,
            today,
        }
    }
}

/// Candidates surviving the no-overlap and lock filters, split by track.
struct Shortlist<'a> {
    staff: Vec<&'a Candidate>,
    /// At most one per patient, lowest priority value winning.
    patients: Vec<&'a Candidate>,
}

/// Drops disabled criteria and duplicate (patient, criteria) pairs while
/// preserving scanner order.
fn intake(candidates: &[Candidate]) -> Vec<&Candidate> {
    let mut seen: HashSet<(PatientId, CriteriaId)> = HashSet::new();
    candidates
        .iter()
        .filter(|candidate| {
            if candidate.criteria().is_disabled() {
                debug!(
                    patient = %candidate.patient_id(),
                    criteria = %candidate.criteria().id(),
                    "candidate dropped: criteria disabled"
                );
                return false;
            }
            seen.insert((candidate.patient_id(), candidate.criteria().id()))
        })
        .collect()
}

/// No-overlap filter. Patient-track candidates are blocked by any unexpired
/// row carrying the patient assignee bit (one patient-track task at a time,
/// premium included); staff-track candidates only by an unexpired row for
/// the same criteria.
fn overlap_blocked(candidate: &Candidate, history: &[EngagementTask], today: NaiveDate) -> bool {
    let mut rows = history
        .iter()
        .filter(|row| row.patient_id() == candidate.patient_id() && !row.is_expired(today));

    if candidate.criteria().is_patient_track() {
        rows.any(|row| row.criteria().assignees().intersects(AssigneeFlags::PATIENT))
    } else {
        rows.any(|row| row.criteria().id() == candidate.criteria().id())
    }
}

/// Lock filter: an expired row for the same (patient, criteria) blocks
/// re-admission while the repeat policy still holds.
fn locked(candidate: &Candidate, history: &[EngagementTask], today: NaiveDate) -> bool {
    history
        .iter()
        .filter(|row| {
            row.patient_id() == candidate.patient_id()
                && row.criteria().id() == candidate.criteria().id()
                && row.is_expired(today)
        })
        .any(|row| {
            let elapsed_days = (today - row.created_at().date_naive()).num_days();
            candidate.criteria().repeat().locks_after(elapsed_days)
        })
}

/// Runs filters one and two and the patient-track dedupe.
fn shortlist<'a>(
    candidates: &'a [Candidate],
    history: &[EngagementTask],
    today: NaiveDate,
) -> Shortlist<'a> {
    let mut staff = Vec::new();
    let mut best_per_patient: BTreeMap<PatientId, &Candidate> = BTreeMap::new();

    for candidate in intake(candidates) {
        if overlap_blocked(candidate, history, today) {
            debug!(
                patient = %candidate.patient_id(),
                criteria = %candidate.criteria().id(),
                "candidate rejected: unexpired overlapping task"
            );
            continue;
        }
        if locked(candidate, history, today) {
            debug!(
                patient = %candidate.patient_id(),
                criteria = %candidate.criteria().id(),
                "candidate rejected: repeat lock still active"
            );
            continue;
        }

        if candidate.criteria().is_patient_track() {
            best_per_patient
                .entry(candidate.patient_id())
                .and_modify(|best| {
                    let challenger =
                        (candidate.criteria().priority(), candidate.criteria().id());
                    if challenger < (best.criteria().priority(), best.criteria().id()) {
                        *best = candidate;
                    }
                })
                .or_insert(candidate);
        } else {
            staff.push(candidate);
        }
    }

    Shortlist {
        staff,
        patients: best_per_patient.into_values().collect(),
    }
}

/// Returns the distinct patients whose eligibility the oracle must answer
/// before [`qualify`] can run: patient-track survivors with an SMS or email
/// channel. Dashboard-only candidates never appear here.
#[must_use]
pub fn eligibility_queries(
    candidates: &[Candidate],
    history: &[EngagementTask],
    today: NaiveDate,
) -> Vec<PatientUniversalId> {
    let mut seen = HashSet::new();
    shortlist(candidates, history, today)
        .patients
        .into_iter()
        .filter(|candidate| !candidate.criteria().channels().is_dashboard_only())
        .filter_map(|candidate| {
            seen.insert(candidate.patient_universal_id())
                .then_some(candidate.patient_universal_id())
        })
        .collect()
}

/// Pure qualification core.
///
/// Given identical snapshot inputs, the admitted set is identical on every
/// run; only freshly minted identifiers and timestamps differ. The clock
/// must agree with `snapshot.today`; the service derives both from the
/// same injected clock.
#[must_use]
pub fn qualify(snapshot: &CycleSnapshot, clock: &impl Clock) -> CycleOutcome {
    let today = snapshot.today;
    let lists = shortlist(&snapshot.candidates, &snapshot.history, today);

    let mut admitted: Vec<&Candidate> = lists.staff;
    for candidate in lists.patients {
        if candidate.criteria().channels().is_dashboard_only() {
            admitted.push(candidate);
            continue;
        }
        let eligible = snapshot
            .eligibility
            .get(&candidate.patient_universal_id())
            .copied()
            .unwrap_or(false);
        if eligible {
            admitted.push(candidate);
        } else {
            debug!(
                patient = %candidate.patient_id(),
                criteria = %candidate.criteria().id(),
                "candidate rejected: patient not eligible for outreach"
            );
        }
    }

    let mut actions = Vec::new();
    let mut events = Vec::new();
    for candidate in &admitted {
        let task = EngagementTask::admit(candidate, clock);
        info!(
            patient = %task.patient_id(),
            criteria = %task.criteria().id(),
            status = task.status().as_str(),
            "candidate admitted"
        );
        if let Some(tag) = task.criteria().analytics_tag() {
            events.push(EngagementEvent::Analytics {
                patient_id: task.patient_id(),
                criteria_id: task.criteria().id(),
                tag: tag.clone(),
            });
        }
        actions.push(TaskAction::Add(task));
    }

    // A completed-but-unexpired row whose trigger recurred is reopened, not
    // re-admitted. The no-overlap filter above already treats such rows as
    // blocking, so an Add and an Update for one pair cannot coexist.
    let recurred: HashSet<(PatientId, CriteriaId)> = snapshot
        .candidates
        .iter()
        .filter(|candidate| !candidate.criteria().is_disabled())
        .map(|candidate| (candidate.patient_id(), candidate.criteria().id()))
        .collect();

    let mut resurrected = 0_usize;
    for row in &snapshot.history {
        if row.status() != TaskStatus::Completed || row.is_expired(today) {
            continue;
        }
        if !recurred.contains(&(row.patient_id(), row.criteria().id())) {
            continue;
        }
        let mut task = row.clone();
        if let Ok(()) = task.reopen(clock) {
            info!(
                patient = %task.patient_id(),
                criteria = %task.criteria().id(),
                "completed task resurrected"
            );
            resurrected += 1;
            actions.push(TaskAction::Update(task));
        }
    }

    let admitted_count = admitted.len();
    events.push(EngagementEvent::CycleCompleted {
        completed_at: clock.utc(),
        admitted: admitted_count,
        resurrected,
    });

    CycleOutcome { actions, events }
}

/// Service-level errors for qualification cycles.
#[derive(Debug, Error)]
pub enum QualificationError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] EngagementTaskRepositoryError),
    /// Eligibility oracle failed.
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),
}

/// Result type for qualification cycle operations.
pub type QualificationResult<T> = Result<T, QualificationError>;

/// Qualification cycle orchestration service.
#[derive(Clone)]
pub struct QualificationEngine<R, O, C>
where
    R: EngagementTaskRepository,
    O: NotificationEligibility,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    oracle: Arc<O>,
    clock: Arc<C>,
}

impl<R, O, C> QualificationEngine<R, O, C>
where
    R: EngagementTaskRepository,
    O: NotificationEligibility,
    C: Clock + Send + Sync,
{
    /// Creates a new qualification engine.
    #[must_use]
    pub const fn new(repository: Arc<R>, oracle: Arc<O>, clock: Arc<C>) -> Self {
        Self {
            repository,
            oracle,
            clock,
        }
    }

    /// Runs one qualification cycle over the given scanner candidates and
    /// returns the intended mutations without applying them.
    ///
    /// The eligibility oracle is consulted at most once per patient-track
    /// SMS/email survivor, before the pure core runs.
    ///
    /// # Errors
    ///
    /// Returns [`QualificationError`] when history cannot be read or the
    /// oracle fails.
    pub async fn run_cycle(&self, candidates: Vec<Candidate>) -> QualificationResult<CycleOutcome> {
        let mut patient_ids: Vec<PatientId> = Vec::new();
        for candidate in &candidates {
            if !patient_ids.contains(&candidate.patient_id()) {
                patient_ids.push(candidate.patient_id());
            }
        }
        let history = self.repository.for_patients(&patient_ids).await?;
        let today = self.clock.utc().date_naive();

        let mut eligibility = HashMap::new();
        for patient in eligibility_queries(&candidates, &history, today) {
            let answer = self.oracle.is_eligible(patient).await?;
            eligibility.insert(patient, answer);
        }

        let snapshot = CycleSnapshot::new(candidates, history, eligibility, today);
        Ok(qualify(&snapshot, &*self.clock))
    }

    /// Persists the outcome's actions, then hands the events back for
    /// publication. Persistence happens-before publication; callers wanting
    /// atomicity across actions supply a transactional repository.
    ///
    /// # Errors
    ///
    /// Returns [`QualificationError::Repository`] when any action fails to
    /// persist. No events are returned in that case.
    pub async fn commit(
        &self,
        outcome: CycleOutcome,
    ) -> QualificationResult<Vec<EngagementEvent>> {
        for action in &outcome.actions {
            match action {
                TaskAction::Add(task) => self.repository.add(task).await?,
                TaskAction::Update(task) => self.repository.update(task).await?,
            }
        }
        Ok(outcome.events)
    }
}

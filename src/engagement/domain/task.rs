//! Engagement task aggregate root and lifecycle types.

use super::{
    Candidate, EngagementCriteria, EngagementDomainError, EngagementPeriod, ParseTaskStatusError,
    PatientId, PatientUniversalId, TaskId, UserId,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
///
/// Expiry is derived from [`Expiration`], not modelled as a status: a
/// completed task can still be unexpired and eligible for resurrection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Admitted, awaiting promotion by the dispatcher.
    PendingAction,
    /// Visible and actionable.
    InProgress,
    /// Closed by the system, a user, or manual completion.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingAction => "pending_action",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` for statuses still counted as open work.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::PendingAction | Self::InProgress)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending_action" => Ok(Self::PendingAction),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Closing date of a task's engagement window, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expiration {
    /// Window never closes.
    Never,
    /// Window closes once the given date is in the past.
    On {
        /// Last date on which the task is still unexpired.
        date: NaiveDate,
    },
}

impl Expiration {
    /// Computes the expiration from a creation date and window length.
    #[must_use]
    pub fn from_period(created_on: NaiveDate, period: EngagementPeriod) -> Self {
        match period {
            EngagementPeriod::Never => Self::Never,
            EngagementPeriod::Days { days } => Self::On {
                date: created_on
                    .checked_add_days(Days::new(u64::from(days)))
                    .unwrap_or(NaiveDate::MAX),
            },
        }
    }

    /// Returns `true` when the window has closed relative to `today`.
    #[must_use]
    pub fn is_expired(self, today: NaiveDate) -> bool {
        match self {
            Self::Never => false,
            Self::On { date } => date < today,
        }
    }
}

/// Who closed a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum CompletedBy {
    /// Closed automatically by the engine.
    System,
    /// Closed by a named user.
    User {
        /// The acting user.
        user_id: UserId,
    },
}

/// Engagement task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementTask {
    id: TaskId,
    patient_id: PatientId,
    patient_universal_id: PatientUniversalId,
    criteria: EngagementCriteria,
    status: TaskStatus,
    is_premium: bool,
    created_at: DateTime<Utc>,
    expiration: Expiration,
    modified_at: DateTime<Utc>,
    completed_by: Option<CompletedBy>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted patient identifier.
    pub patient_id: PatientId,
    /// Persisted cross-system patient identifier.
    pub patient_universal_id: PatientUniversalId,
    /// Criteria snapshot taken at admission time.
    pub criteria: EngagementCriteria,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted premium flag.
    pub is_premium: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted window close date.
    pub expiration: Expiration,
    /// Persisted latest lifecycle timestamp.
    pub modified_at: DateTime<Utc>,
    /// Persisted completion actor, if closed.
    pub completed_by: Option<CompletedBy>,
}

impl EngagementTask {
    /// Materializes an admitted candidate into a new task row.
    ///
    /// Dashboard-only candidates start [`TaskStatus::InProgress`], since
    /// there is no notification to dispatch; all others start
    /// [`TaskStatus::PendingAction`]. The expiration is fixed here and never
    /// recomputed.
    #[must_use]
    pub fn admit(candidate: &Candidate, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let status = if candidate.criteria().channels().is_dashboard_only() {
            TaskStatus::InProgress
        } else {
            TaskStatus::PendingAction
        };

        Self {
            id: TaskId::new(),
            patient_id: candidate.patient_id(),
            patient_universal_id: candidate.patient_universal_id(),
            criteria: candidate.criteria().clone(),
            status,
            is_premium: candidate.is_premium(),
            created_at: timestamp,
            expiration: Expiration::from_period(
                timestamp.date_naive(),
                candidate.criteria().period(),
            ),
            modified_at: timestamp,
            completed_by: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            patient_id: data.patient_id,
            patient_universal_id: data.patient_universal_id,
            criteria: data.criteria,
            status: data.status,
            is_premium: data.is_premium,
            created_at: data.created_at,
            expiration: data.expiration,
            modified_at: data.modified_at,
            completed_by: data.completed_by,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
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

    /// Returns the criteria snapshot taken at admission time.
    #[must_use]
    pub const fn criteria(&self) -> &EngagementCriteria {
        &self.criteria
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns `true` for premium-programme patients.
    #[must_use]
    pub const fn is_premium(&self) -> bool {
        self.is_premium
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the window close date fixed at creation.
    #[must_use]
    pub const fn expiration(&self) -> Expiration {
        self.expiration
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Returns who closed the task, if anyone.
    #[must_use]
    pub const fn completed_by(&self) -> Option<CompletedBy> {
        self.completed_by
    }

    /// Returns `true` when the engagement window has closed.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration.is_expired(today)
    }

    /// Returns `true` for open, unexpired work.
    #[must_use]
    pub fn is_actionable(&self, today: NaiveDate) -> bool {
        self.status.is_active() && !self.is_expired(today)
    }

    /// Promotes a pending task to in-progress.
    ///
    /// Returns `true` when the promotion happened. Anything other than an
    /// unexpired pending task is a no-op, so re-invocation is safe.
    pub fn begin_progress(&mut self, clock: &impl Clock) -> bool {
        let today = clock.utc().date_naive();
        if self.status != TaskStatus::PendingAction || self.is_expired(today) {
            return false;
        }
        self.status = TaskStatus::InProgress;
        self.touch(clock);
        true
    }

    /// Closes the task, recording the acting party.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementDomainError::AlreadyCompleted`] when the task is
    /// already closed.
    pub fn complete(
        &mut self,
        by: CompletedBy,
        clock: &impl Clock,
    ) -> Result<(), EngagementDomainError> {
        if self.status == TaskStatus::Completed {
            return Err(EngagementDomainError::AlreadyCompleted(self.id));
        }
        self.status = TaskStatus::Completed;
        self.completed_by = Some(by);
        self.touch(clock);
        Ok(())
    }

    /// Reopens a completed task whose trigger condition recurred inside the
    /// unexpired window (resurrection).
    ///
    /// # Errors
    ///
    /// Returns [`EngagementDomainError::NotCompleted`] when the task is not
    /// completed, or [`EngagementDomainError::TaskExpired`] when the window
    /// has already closed.
    pub fn reopen(&mut self, clock: &impl Clock) -> Result<(), EngagementDomainError> {
        if self.status != TaskStatus::Completed {
            return Err(EngagementDomainError::NotCompleted(self.id));
        }
        if self.is_expired(clock.utc().date_naive()) {
            return Err(EngagementDomainError::TaskExpired(self.id));
        }
        self.status = TaskStatus::InProgress;
        self.completed_by = None;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `modified_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.modified_at = clock.utc();
    }
}

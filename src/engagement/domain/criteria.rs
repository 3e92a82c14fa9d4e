//! Engagement criteria definitions: the named rules describing why, for
//! whom, and over which channels a patient is engaged.

use super::{
    AssigneeFlags, ChannelFlags, CriteriaId, EngagementDomainError, ParseCriteriaTypeError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical classification tag of an engagement criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaType {
    /// Annual wellness visit is due.
    AnnualWellnessVisit,
    /// Follow-up with the provider after a recent visit.
    ProviderFollowUp,
    /// New lab results need review with the care team.
    LabResultsReview,
    /// Introductory session with a health coach.
    HealthCoachIntro,
    /// Scheduled nutrition check-in.
    NutritionCheckIn,
    /// Medication adherence or reconciliation review.
    MedicationReview,
    /// Periodic care plan review.
    CarePlanReview,
    /// Preventive screening is due.
    PreventiveScreening,
}

impl CriteriaType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AnnualWellnessVisit => "annual_wellness_visit",
            Self::ProviderFollowUp => "provider_follow_up",
            Self::LabResultsReview => "lab_results_review",
            Self::HealthCoachIntro => "health_coach_intro",
            Self::NutritionCheckIn => "nutrition_check_in",
            Self::MedicationReview => "medication_review",
            Self::CarePlanReview => "care_plan_review",
            Self::PreventiveScreening => "preventive_screening",
        }
    }
}

impl TryFrom<&str> for CriteriaType {
    type Error = ParseCriteriaTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "annual_wellness_visit" => Ok(Self::AnnualWellnessVisit),
            "provider_follow_up" => Ok(Self::ProviderFollowUp),
            "lab_results_review" => Ok(Self::LabResultsReview),
            "health_coach_intro" => Ok(Self::HealthCoachIntro),
            "nutrition_check_in" => Ok(Self::NutritionCheckIn),
            "medication_review" => Ok(Self::MedicationReview),
            "care_plan_review" => Ok(Self::CarePlanReview),
            "preventive_screening" => Ok(Self::PreventiveScreening),
            _ => Err(ParseCriteriaTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for CriteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often a criteria may re-fire for the same patient after its last
/// window expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RepeatPolicy {
    /// Runs at most once, ever.
    Once,
    /// May re-fire once more than the given number of days has elapsed
    /// since the prior record's creation.
    AfterDays {
        /// Minimum lock period in days.
        days: u32,
    },
}

impl RepeatPolicy {
    /// Returns `true` while a prior expired record still locks re-admission.
    #[must_use]
    pub fn locks_after(self, elapsed_days: i64) -> bool {
        match self {
            Self::Once => true,
            Self::AfterDays { days } => elapsed_days <= i64::from(days),
        }
    }
}

/// Length of the engagement window opened by an admitted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "period", rename_all = "snake_case")]
pub enum EngagementPeriod {
    /// Window closes the given number of days after creation.
    Days {
        /// Window length in days.
        days: u32,
    },
    /// Window never closes.
    Never,
}

/// Validated, non-empty analytics event tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyticsTag(String);

impl AnalyticsTag {
    /// Creates a validated analytics tag.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementDomainError::EmptyAnalyticsTag`] when the value
    /// is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, EngagementDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EngagementDomainError::EmptyAnalyticsTag);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the tag as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalyticsTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display metadata shown alongside an engagement task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaDisplay {
    title: String,
    description: Option<String>,
}

impl CriteriaDisplay {
    /// Creates validated display metadata.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementDomainError::EmptyCriteriaTitle`] when the title
    /// is empty after trimming.
    pub fn new(title: impl Into<String>) -> Result<Self, EngagementDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EngagementDomainError::EmptyCriteriaTitle);
        }
        Ok(Self {
            title: trimmed.to_owned(),
            description: None,
        })
    }

    /// Sets the longer description shown on detail views.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the display description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A named engagement rule: who it targets, how it is delivered, how often
/// it may re-fire, and how long its window stays open.
///
/// Tasks carry a full snapshot of the criteria that admitted them, so rule
/// edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCriteria {
    id: CriteriaId,
    criteria_type: CriteriaType,
    assignees: AssigneeFlags,
    channels: ChannelFlags,
    priority: u32,
    repeat: RepeatPolicy,
    period: EngagementPeriod,
    is_disabled: bool,
    analytics_tag: Option<AnalyticsTag>,
    display: CriteriaDisplay,
}

impl EngagementCriteria {
    /// Creates an enabled criteria with no analytics tag.
    #[must_use]
    pub const fn new(
        id: CriteriaId,
        criteria_type: CriteriaType,
        assignees: AssigneeFlags,
        channels: ChannelFlags,
        priority: u32,
        repeat: RepeatPolicy,
        period: EngagementPeriod,
        display: CriteriaDisplay,
    ) -> Self {
        Self {
            id,
            criteria_type,
            assignees,
            channels,
            priority,
            repeat,
            period,
            is_disabled: false,
            analytics_tag: None,
            display,
        }
    }

    /// Attaches an analytics event tag emitted on admission.
    #[must_use]
    pub fn with_analytics_tag(mut self, tag: AnalyticsTag) -> Self {
        self.analytics_tag = Some(tag);
        self
    }

    /// Marks the criteria as disabled; disabled criteria are never admitted.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.is_disabled = true;
        self
    }

    /// Returns the criteria identifier.
    #[must_use]
    pub const fn id(&self) -> CriteriaId {
        self.id
    }

    /// Returns the clinical classification tag.
    #[must_use]
    pub const fn criteria_type(&self) -> CriteriaType {
        self.criteria_type
    }

    /// Returns the audience bits.
    #[must_use]
    pub const fn assignees(&self) -> AssigneeFlags {
        self.assignees
    }

    /// Returns the delivery channel bits.
    #[must_use]
    pub const fn channels(&self) -> ChannelFlags {
        self.channels
    }

    /// Returns the priority; lower values win ties.
    #[must_use]
    pub const fn priority(&self) -> u32 {
        self.priority
    }

    /// Returns the repeat policy.
    #[must_use]
    pub const fn repeat(&self) -> RepeatPolicy {
        self.repeat
    }

    /// Returns the engagement window length.
    #[must_use]
    pub const fn period(&self) -> EngagementPeriod {
        self.period
    }

    /// Returns `true` when the criteria is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.is_disabled
    }

    /// Returns the analytics event tag, if any.
    #[must_use]
    pub const fn analytics_tag(&self) -> Option<&AnalyticsTag> {
        self.analytics_tag.as_ref()
    }

    /// Returns the display metadata.
    #[must_use]
    pub const fn display(&self) -> &CriteriaDisplay {
        &self.display
    }

    /// Returns `true` when the audience bits include the patient track.
    #[must_use]
    pub const fn is_patient_track(&self) -> bool {
        self.assignees.intersects(AssigneeFlags::PATIENT)
    }
}

//! Orchestration services for the engagement engine.

mod auto_completion;
mod completion;
mod dispatcher;
mod qualification;

pub use auto_completion::{
    AppointmentType, AutoCompletionEngine, AutoCompletionError, AutoCompletionResult,
    VisitCreditConfig,
};
pub use completion::{ManualCompletionError, ManualCompletionResult, ManualCompletionService};
pub use dispatcher::{
    DispatchError, DispatchOutcome, DispatchResult, NotificationChannel, NotificationDispatcher,
    NotificationRequest,
};
pub use qualification::{
    CycleOutcome, CycleSnapshot, EngagementEvent, QualificationEngine, QualificationError,
    QualificationResult, TaskAction, eligibility_queries, qualify,
};

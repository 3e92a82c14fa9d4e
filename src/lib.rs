//! Outreach: patient engagement qualification and lifecycle engine.
//!
//! Given a stream of candidate (patient, rule) matches from an external
//! scanner, the engine decides which candidates are admitted as new
//! outreach tasks, which completed tasks are resurrected, which active
//! tasks auto-complete in response to appointments, and how task state
//! progresses until completion. The scanner, the notification transport,
//! durable storage, and dashboard projections are external collaborators
//! behind ports.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! The qualification core is a pure function over an immutable snapshot:
//! it returns intended mutations and events, and a caller-owned commit
//! step applies them; persistence happens-before event publication.
//!
//! # Modules
//!
//! - [`engagement`]: Qualification, auto-completion, dispatch, and the task
//!   lifecycle
//! - [`digest`]: Per-user open-work counter maintenance

pub mod digest;
pub mod engagement;

//! In-memory adapter implementations of the engagement ports.

mod task;

pub use task::InMemoryEngagementTaskRepository;

//! Patient engagement qualification and lifecycle.
//!
//! Given scanner candidates, the engine decides which are admitted as new
//! outreach tasks, which completed tasks are resurrected, which active
//! tasks auto-complete on appointments, and how tasks progress from pending
//! to completed. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//!
//! The qualification core computes intended mutations over an immutable
//! snapshot; storage is only touched in an explicit commit step.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

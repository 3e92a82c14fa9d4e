//! Delta-based reconciliation of the per-user digest counter.

use super::{
    domain::{DigestCounter, DigestDomainError},
    ports::{DigestCounterRepository, DigestCounterRepositoryError},
};
use crate::engagement::domain::UserId;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reconciling a digest counter.
#[derive(Debug, Error)]
pub enum DigestMaintainerError {
    /// Stored counter value was corrupt.
    #[error(transparent)]
    Domain(#[from] DigestDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] DigestCounterRepositoryError),
}

/// Result type for digest maintainer operations.
pub type DigestMaintainerResult<T> = Result<T, DigestMaintainerError>;

/// Keeps the per-user digest counter in sync via delta arithmetic.
///
/// Deltas are applied on top of whatever value is stored, so decrements
/// made independently by other flows survive reconciliation; the counter is
/// never overwritten wholesale and never requires a full task enumeration.
#[derive(Clone)]
pub struct DigestCounterMaintainer<R>
where
    R: DigestCounterRepository,
{
    repository: Arc<R>,
    default_count: u32,
}

impl<R> DigestCounterMaintainer<R>
where
    R: DigestCounterRepository,
{
    /// Creates a maintainer with the fixed baseline default count.
    #[must_use]
    pub const fn new(repository: Arc<R>, default_count: u32) -> Self {
        Self {
            repository,
            default_count,
        }
    }

    /// Reconciles the user's counter against a freshly recomputed count of
    /// active tasks.
    ///
    /// Computes `delta = default − current_active`. An existing row has the
    /// delta added to its stored value; a missing row is created holding
    /// `default + delta`.
    ///
    /// # Errors
    ///
    /// Returns [`DigestMaintainerError::Domain`] when the stored value is
    /// corrupt, or [`DigestMaintainerError::Repository`] on persistence
    /// failure.
    pub async fn reconcile(
        &self,
        user_id: UserId,
        current_active: u32,
    ) -> DigestMaintainerResult<DigestCounter> {
        let delta = i64::from(self.default_count) - i64::from(current_active);

        let counter = match self.repository.find_by_user(user_id).await? {
            Some(mut existing) => {
                existing.apply_delta(delta)?;
                existing
            }
            None => DigestCounter::new(user_id, i64::from(self.default_count).saturating_add(delta)),
        };

        self.repository.upsert(&counter).await?;
        debug!(user = %user_id, value = counter.value(), delta, "digest counter reconciled");
        Ok(counter)
    }
}

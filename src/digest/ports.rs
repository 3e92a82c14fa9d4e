//! Repository port for digest counter persistence.

use super::domain::DigestCounter;
use crate::engagement::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for digest counter repository operations.
pub type DigestCounterRepositoryResult<T> = Result<T, DigestCounterRepositoryError>;

/// Digest counter persistence contract.
#[async_trait]
pub trait DigestCounterRepository: Send + Sync {
    /// Finds the counter row for a user.
    ///
    /// Returns `None` when no row exists yet.
    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> DigestCounterRepositoryResult<Option<DigestCounter>>;

    /// Inserts or replaces the counter row for its user.
    async fn upsert(&self, counter: &DigestCounter) -> DigestCounterRepositoryResult<()>;
}

/// Errors returned by digest counter repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DigestCounterRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DigestCounterRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

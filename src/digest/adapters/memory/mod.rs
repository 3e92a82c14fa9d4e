//! In-memory digest counter repository for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::digest::{
    domain::DigestCounter,
    ports::{DigestCounterRepository, DigestCounterRepositoryError, DigestCounterRepositoryResult},
};
use crate::engagement::domain::UserId;

/// Thread-safe in-memory digest counter repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDigestCounterRepository {
    counters: Arc<RwLock<HashMap<UserId, DigestCounter>>>,
}

impl InMemoryDigestCounterRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> DigestCounterRepositoryError {
    DigestCounterRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DigestCounterRepository for InMemoryDigestCounterRepository {
    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> DigestCounterRepositoryResult<Option<DigestCounter>> {
        let counters = self.counters.read().map_err(lock_error)?;
        Ok(counters.get(&user_id).cloned())
    }

    async fn upsert(&self, counter: &DigestCounter) -> DigestCounterRepositoryResult<()> {
        let mut counters = self.counters.write().map_err(lock_error)?;
        counters.insert(counter.user_id(), counter.clone());
        Ok(())
    }
}

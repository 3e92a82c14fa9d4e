//! Domain model for the per-user digest counter.

use crate::engagement::domain::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while mutating digest counters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DigestDomainError {
    /// The stored counter value is not a valid integer.
    #[error("counter for user {user_id} holds non-numeric value '{value}'")]
    InvalidCounterValue {
        /// Owner of the corrupt row.
        user_id: UserId,
        /// The stored value.
        value: String,
    },
}

/// Denormalized per-user count of open engagement work.
///
/// The value is stored as an integer-encoded string and adjusted by delta,
/// never recomputed wholesale by this flow; other flows decrement it
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestCounter {
    user_id: UserId,
    value: String,
}

impl DigestCounter {
    /// Creates a counter holding the given value.
    #[must_use]
    pub fn new(user_id: UserId, value: i64) -> Self {
        Self {
            user_id,
            value: value.to_string(),
        }
    }

    /// Reconstructs a counter from its persisted string value.
    #[must_use]
    pub const fn from_persisted(user_id: UserId, value: String) -> Self {
        Self { user_id, value }
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the stored value string.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Adds a delta to the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`DigestDomainError::InvalidCounterValue`] when the stored
    /// value does not parse as an integer.
    pub fn apply_delta(&mut self, delta: i64) -> Result<(), DigestDomainError> {
        let current: i64 =
            self.value
                .trim()
                .parse()
                .map_err(|_| DigestDomainError::InvalidCounterValue {
                    user_id: self.user_id,
                    value: self.value.clone(),
                })?;
        self.value = current.saturating_add(delta).to_string();
        Ok(())
    }
}

//! Business identifier allocation.
//!
//! Candidates are sampled uniformly from [`BusinessId::ALPHABET`] and checked against the store
//! until an unused one is found or the attempt budget runs out. The store's
//! uniqueness constraint remains the authoritative guard; the pre-check only
//! keeps collisions from reaching the insert.

use crate::weld_job::{
    domain::BusinessId,
    ports::{WeldJobRepository, WeldJobRepositoryError},
};
use rand::seq::SliceRandom;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Produces candidate business identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait BusinessIdSource: Send + Sync {
    /// Returns the next candidate. Candidates need not be unique.
    fn next_candidate(&self) -> BusinessId;
}

/// Uniform random candidates over [`BusinessId::ALPHABET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBusinessIdSource;

impl BusinessIdSource for RandomBusinessIdSource {
    fn next_candidate(&self) -> BusinessId {
        let mut rng = rand::thread_rng();
        let code: String = (0..BusinessId::LENGTH)
            .filter_map(|_| BusinessId::ALPHABET.choose(&mut rng).copied().map(char::from))
            .collect();
        BusinessId::from_generated(code)
    }
}

/// Errors returned by business identifier allocation.
#[derive(Debug, Clone, Error)]
pub enum AllocationError {
    /// Every candidate within the attempt budget was taken.
    #[error("no unused business identifier found after {attempts} attempts")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
    },

    /// The existence check failed.
    #[error(transparent)]
    Repository(#[from] WeldJobRepositoryError),
}

/// Attempt budget used when none is configured.
pub const DEFAULT_ALLOCATION_ATTEMPTS: u32 = 100;

/// Allocates business identifiers unused at the time of the check.
#[derive(Clone)]
pub struct BusinessIdAllocator<R, S>
where
    R: WeldJobRepository,
    S: BusinessIdSource,
{
    repository: Arc<R>,
    source: Arc<S>,
    max_attempts: u32,
}

impl<R, S> BusinessIdAllocator<R, S>
where
    R: WeldJobRepository,
    S: BusinessIdSource,
{
    /// Creates an allocator with the given attempt budget.
    #[must_use]
    pub const fn new(repository: Arc<R>, source: Arc<S>, max_attempts: u32) -> Self {
        Self {
            repository,
            source,
            max_attempts,
        }
    }

    /// Allocates an identifier not present in the store.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::Exhausted`] when every candidate within the
    /// budget is taken, or [`AllocationError::Repository`] when an existence
    /// check fails. A failed check is never treated as "unused".
    pub async fn allocate(&self) -> Result<BusinessId, AllocationError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.source.next_candidate();
            if !self.repository.business_id_exists(&candidate).await? {
                debug!(business_id = %candidate, attempt, "allocated business identifier");
                return Ok(candidate);
            }
            debug!(business_id = %candidate, attempt, "business identifier already taken");
        }
        warn!(
            attempts = self.max_attempts,
            "business identifier allocation exhausted"
        );
        Err(AllocationError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

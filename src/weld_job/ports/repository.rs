//! Repository port for weld job persistence and lookup.

use crate::weld_job::domain::{
    BusinessId, DeviceId, DeviceName, NewWeldJob, SequenceId, WeldJobRecord,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for weld job repository operations.
pub type WeldJobRepositoryResult<T> = Result<T, WeldJobRepositoryError>;

/// Weld job persistence contract.
///
/// Ordering contract: "oldest" and "newest" refer to `created_at`, with
/// ties broken by `sequence_id`.
#[async_trait]
pub trait WeldJobRepository: Send + Sync {
    /// Inserts a new open job and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobRepositoryError::DuplicateBusinessId`] when the
    /// business identifier is taken, or
    /// [`WeldJobRepositoryError::OpenJobConflict`] when the device already
    /// has an open job and the store enforces the one-open-job index.
    async fn insert(&self, job: &NewWeldJob) -> WeldJobRepositoryResult<WeldJobRecord>;

    /// Persists the mutable columns of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobRepositoryError::NotFound`] when the record does not
    /// exist, or a uniqueness error as for [`Self::insert`].
    async fn update(&self, record: &WeldJobRecord) -> WeldJobRepositoryResult<()>;

    /// Hard-deletes a record. Returns `false` when it did not exist.
    async fn delete(&self, sequence_id: SequenceId) -> WeldJobRepositoryResult<bool>;

    /// Finds a record by primary identity.
    async fn find_by_sequence_id(
        &self,
        sequence_id: SequenceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>>;

    /// Finds the record holding a business identifier.
    ///
    /// When a store without the uniqueness constraint holds duplicates, the
    /// oldest holder is returned.
    async fn find_by_business_id(
        &self,
        business_id: &BusinessId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>>;

    /// Finds the oldest open record for a device.
    async fn find_oldest_open(
        &self,
        device_id: &DeviceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>>;

    /// Finds the newest open record for a device.
    async fn find_newest_open(
        &self,
        device_id: &DeviceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>>;

    /// Finds the newest record for a device regardless of state.
    async fn find_latest_for_device(
        &self,
        device_id: &DeviceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>>;

    /// Lists all records carrying the device name, newest first.
    async fn list_by_device_name(
        &self,
        device_name: &DeviceName,
    ) -> WeldJobRepositoryResult<Vec<WeldJobRecord>>;

    /// Returns `true` when any record carries the business identifier.
    async fn business_id_exists(&self, business_id: &BusinessId) -> WeldJobRepositoryResult<bool>;
}

/// Errors returned by weld job repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WeldJobRepositoryError {
    /// The business identifier is already held by another record.
    #[error("duplicate business identifier: {0}")]
    DuplicateBusinessId(BusinessId),

    /// The device already has an open job.
    #[error("device {0} already has an open job")]
    OpenJobConflict(DeviceId),

    /// The record was not found.
    #[error("weld job record not found: {0}")]
    NotFound(SequenceId),

    /// The store could not be reached.
    #[error("store unreachable: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WeldJobRepositoryError {
    /// Wraps a connection failure.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for uniqueness violations a caller may retry.
    #[must_use]
    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::DuplicateBusinessId(_) | Self::OpenJobConflict(_))
    }
}

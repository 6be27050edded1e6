//! Service layer for weld job registration, completion and housekeeping.

use super::allocator::{
    AllocationError, BusinessIdAllocator, BusinessIdSource, DEFAULT_ALLOCATION_ATTEMPTS,
};
use crate::weld_job::{
    domain::{
        BusinessId, DeviceId, DeviceName, LastJobStatus, NewWeldJob, SequenceId, WeldJobDetails,
        WeldJobDomainError, WeldJobRecord,
    },
    ports::{
        SchemaGuardError, SchemaReport, WeldJobRepository, WeldJobRepositoryError, WeldJobSchema,
    },
};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for registering weld details against a device.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterWeldJobRequest {
    device_id: String,
    #[serde(default)]
    device_name: Option<String>,
    #[serde(default)]
    business_id: Option<String>,
    #[serde(flatten)]
    details: WeldJobDetails,
}

impl RegisterWeldJobRequest {
    /// Creates a request for the given device with no weld details.
    #[must_use]
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            device_name: None,
            business_id: None,
            details: WeldJobDetails::default(),
        }
    }

    /// Sets the descriptive device name.
    #[must_use]
    pub fn with_device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }

    /// Sets a caller-chosen business identifier.
    #[must_use]
    pub fn with_business_id(mut self, business_id: impl Into<String>) -> Self {
        self.business_id = Some(business_id.into());
        self
    }

    /// Sets the weld details.
    #[must_use]
    pub fn with_details(mut self, details: WeldJobDetails) -> Self {
        self.details = details;
        self
    }
}

/// Request payload for editing an existing record by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EditWeldJobRequest {
    #[serde(default)]
    device_name: Option<String>,
    #[serde(flatten)]
    details: WeldJobDetails,
}

impl EditWeldJobRequest {
    /// Creates an edit replacing the weld details.
    #[must_use]
    pub fn new(details: WeldJobDetails) -> Self {
        Self {
            device_name: None,
            details,
        }
    }

    /// Sets the descriptive device name.
    #[must_use]
    pub fn with_device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }
}

/// Whether a registration opened a new row or resumed an open one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationDisposition {
    /// A new row was inserted.
    Created,
    /// The device's open row was updated in place.
    Resumed,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// Identity of the written row.
    pub sequence_id: SequenceId,
    /// Business identifier carried by the row.
    pub business_id: BusinessId,
    /// Insert or update.
    pub disposition: RegistrationDisposition,
}

/// Service-level errors for weld job lifecycle operations.
#[derive(Debug, Error)]
pub enum WeldJobLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WeldJobDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WeldJobRepositoryError),
    /// Business identifier allocation failed.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    /// The schema guard aborted.
    #[error(transparent)]
    Schema(#[from] SchemaGuardError),
}

impl WeldJobLifecycleError {
    /// Returns `true` when the failure was a uniqueness collision the caller
    /// may present as "try again".
    #[must_use]
    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_unique_violation())
    }
}

/// Result type for weld job lifecycle service operations.
pub type WeldJobLifecycleResult<T> = Result<T, WeldJobLifecycleError>;

struct ValidatedRegistration {
    device_id: DeviceId,
    device_name: Option<DeviceName>,
    business_id: Option<BusinessId>,
    details: WeldJobDetails,
}

impl TryFrom<RegisterWeldJobRequest> for ValidatedRegistration {
    type Error = WeldJobDomainError;

    fn try_from(request: RegisterWeldJobRequest) -> Result<Self, Self::Error> {
        let RegisterWeldJobRequest {
            device_id,
            device_name,
            business_id,
            details,
        } = request;
        Ok(Self {
            device_id: DeviceId::new(device_id)?,
            device_name: optional_device_name(device_name)?,
            business_id: business_id
                .filter(|raw| !raw.trim().is_empty())
                .map(BusinessId::new)
                .transpose()?,
            details: details.validated()?,
        })
    }
}

fn optional_device_name(value: Option<String>) -> Result<Option<DeviceName>, WeldJobDomainError> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(DeviceName::new)
        .transpose()
}

/// Weld job lifecycle orchestration service.
#[derive(Clone)]
pub struct WeldJobLifecycleService<R, S, C>
where
    R: WeldJobRepository,
    S: BusinessIdSource,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    allocator: BusinessIdAllocator<R, S>,
    clock: Arc<C>,
}

impl<R, S, C> WeldJobLifecycleService<R, S, C>
where
    R: WeldJobRepository,
    S: BusinessIdSource,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default allocation budget.
    #[must_use]
    pub fn new(repository: Arc<R>, source: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_max_attempts(
            repository,
            source,
            clock,
            DEFAULT_ALLOCATION_ATTEMPTS,
        )
    }

    /// Creates a service with an explicit allocation budget.
    #[must_use]
    pub fn with_max_attempts(
        repository: Arc<R>,
        source: Arc<S>,
        clock: Arc<C>,
        max_attempts: u32,
    ) -> Self {
        let allocator = BusinessIdAllocator::new(Arc::clone(&repository), source, max_attempts);
        Self {
            repository,
            allocator,
            clock,
        }
    }

    /// Registers weld details for a device.
    ///
    /// Resumes the device's oldest open record when one exists, attaching a
    /// business identifier if it has none; otherwise inserts a new open
    /// record with a freshly allocated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Domain`] for invalid payloads,
    /// [`WeldJobLifecycleError::Allocation`] when no identifier could be
    /// allocated, and [`WeldJobLifecycleError::Repository`] for store
    /// failures, including uniqueness collisions.
    pub async fn register(
        &self,
        request: RegisterWeldJobRequest,
    ) -> WeldJobLifecycleResult<RegistrationOutcome> {
        let registration = ValidatedRegistration::try_from(request)?;

        if let Some(mut record) = self
            .repository
            .find_oldest_open(&registration.device_id)
            .await?
        {
            let business_id = match record.business_id() {
                Some(existing) => existing.clone(),
                None => {
                    let assigned = self.resolve_business_id(registration.business_id).await?;
                    record.assign_business_id(assigned.clone())?;
                    assigned
                }
            };
            record.apply_registration(registration.device_name, registration.details);
            self.repository.update(&record).await?;
            info!(
                device_id = %record.device_id(),
                sequence_id = %record.sequence_id(),
                business_id = %business_id,
                "resumed open weld job"
            );
            return Ok(RegistrationOutcome {
                sequence_id: record.sequence_id(),
                business_id,
                disposition: RegistrationDisposition::Resumed,
            });
        }

        let business_id = self.resolve_business_id(registration.business_id).await?;
        let job = NewWeldJob::new(
            business_id,
            registration.device_id,
            registration.device_name,
            registration.details,
            &*self.clock,
        );
        let record = self.repository.insert(&job).await?;
        info!(
            device_id = %record.device_id(),
            sequence_id = %record.sequence_id(),
            business_id = %job.business_id(),
            "created weld job"
        );
        Ok(RegistrationOutcome {
            sequence_id: record.sequence_id(),
            business_id: job.business_id().clone(),
            disposition: RegistrationDisposition::Created,
        })
    }

    /// Closes the newest open job of a device.
    ///
    /// Returns `Ok(None)` when the device has nothing open; nothing is
    /// modified in that case.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Repository`] when persistence fails.
    pub async fn complete(&self, device_id: &DeviceId) -> WeldJobLifecycleResult<Option<SequenceId>> {
        let Some(mut record) = self.repository.find_newest_open(device_id).await? else {
            info!(device_id = %device_id, "no open weld job to complete");
            return Ok(None);
        };
        record.mark_complete();
        self.repository.update(&record).await?;
        info!(
            device_id = %device_id,
            sequence_id = %record.sequence_id(),
            "completed weld job"
        );
        Ok(Some(record.sequence_id()))
    }

    /// Nulls the weld details of a record and closes it.
    ///
    /// The next registration for the same device opens a new row. Returns
    /// `Ok(None)` when the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Repository`] when persistence fails.
    pub async fn clear(
        &self,
        sequence_id: SequenceId,
    ) -> WeldJobLifecycleResult<Option<WeldJobRecord>> {
        let Some(mut record) = self.repository.find_by_sequence_id(sequence_id).await? else {
            return Ok(None);
        };
        record.clear();
        self.repository.update(&record).await?;
        info!(
            device_id = %record.device_id(),
            sequence_id = %sequence_id,
            "cleared weld job"
        );
        Ok(Some(record))
    }

    /// Hard-deletes a record. Returns `false` when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Repository`] when persistence fails.
    pub async fn delete(&self, sequence_id: SequenceId) -> WeldJobLifecycleResult<bool> {
        let deleted = self.repository.delete(sequence_id).await?;
        if deleted {
            info!(sequence_id = %sequence_id, "deleted weld job");
        }
        Ok(deleted)
    }

    /// Overwrites the weld details of a record by identity.
    ///
    /// The business identifier and completion state are left untouched.
    /// Returns `Ok(None)` when the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Domain`] for invalid payloads and
    /// [`WeldJobLifecycleError::Repository`] when persistence fails.
    pub async fn edit(
        &self,
        sequence_id: SequenceId,
        request: EditWeldJobRequest,
    ) -> WeldJobLifecycleResult<Option<WeldJobRecord>> {
        let device_name = optional_device_name(request.device_name)?;
        let details = request.details.validated()?;
        let Some(mut record) = self.repository.find_by_sequence_id(sequence_id).await? else {
            return Ok(None);
        };
        record.edit(device_name, details);
        self.repository.update(&record).await?;
        Ok(Some(record))
    }

    /// Finds a record by identity.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Repository`] when lookup fails.
    pub async fn find(
        &self,
        sequence_id: SequenceId,
    ) -> WeldJobLifecycleResult<Option<WeldJobRecord>> {
        Ok(self.repository.find_by_sequence_id(sequence_id).await?)
    }

    /// Finds the record carrying a business identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Repository`] when lookup fails.
    pub async fn find_by_business_id(
        &self,
        business_id: &BusinessId,
    ) -> WeldJobLifecycleResult<Option<WeldJobRecord>> {
        Ok(self.repository.find_by_business_id(business_id).await?)
    }

    /// Lists records for a dashboard device view, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Repository`] when lookup fails.
    pub async fn list_by_device_name(
        &self,
        device_name: &DeviceName,
    ) -> WeldJobLifecycleResult<Vec<WeldJobRecord>> {
        Ok(self.repository.list_by_device_name(device_name).await?)
    }

    /// Returns the device identifier of the newest record with this name.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Repository`] when lookup fails.
    pub async fn latest_device_id_for_name(
        &self,
        device_name: &DeviceName,
    ) -> WeldJobLifecycleResult<Option<DeviceId>> {
        let records = self.repository.list_by_device_name(device_name).await?;
        Ok(records
            .into_iter()
            .next()
            .map(|record| record.device_id().clone()))
    }

    /// Reports the state of the newest job recorded for a device.
    ///
    /// A stored flag that is unset reads as completed.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Repository`] when lookup fails.
    pub async fn last_job_status(&self, device_id: &DeviceId) -> WeldJobLifecycleResult<LastJobStatus> {
        let latest = self.repository.find_latest_for_device(device_id).await?;
        Ok(latest.map_or(LastJobStatus::NoRecord, |record| {
            LastJobStatus::from(record.completion_flag())
        }))
    }

    /// Allocates a business identifier unused at the time of the call.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Allocation`] when allocation fails.
    pub async fn allocate_identifier(&self) -> WeldJobLifecycleResult<BusinessId> {
        Ok(self.allocator.allocate().await?)
    }

    async fn resolve_business_id(
        &self,
        requested: Option<BusinessId>,
    ) -> Result<BusinessId, AllocationError> {
        match requested {
            Some(business_id) => Ok(business_id),
            None => self.allocator.allocate().await,
        }
    }
}

impl<R, S, C> WeldJobLifecycleService<R, S, C>
where
    R: WeldJobRepository + WeldJobSchema,
    S: BusinessIdSource,
    C: Clock + Send + Sync,
{
    /// Runs the schema guard against the store.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobLifecycleError::Schema`] when a mandatory step fails.
    pub async fn ensure_schema(&self) -> WeldJobLifecycleResult<SchemaReport> {
        Ok(self.repository.ensure_schema().await?)
    }
}

//! Weld job aggregate root and insert payload.

use super::{
    BusinessId, CompletionFlag, DeviceId, DeviceName, SequenceId, WeldJobDetails,
    WeldJobDomainError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One persisted weld job attempt on a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeldJobRecord {
    sequence_id: SequenceId,
    business_id: Option<BusinessId>,
    device_id: DeviceId,
    device_name: Option<DeviceName>,
    details: WeldJobDetails,
    completion_flag: CompletionFlag,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted weld job record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWeldJobData {
    /// Store-assigned identity.
    pub sequence_id: SequenceId,
    /// Business identifier, if assigned.
    pub business_id: Option<BusinessId>,
    /// Producing device.
    pub device_id: DeviceId,
    /// Descriptive device label, if known.
    pub device_name: Option<DeviceName>,
    /// Operator-entered weld parameters.
    pub details: WeldJobDetails,
    /// Completion state.
    pub completion_flag: CompletionFlag,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl WeldJobRecord {
    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWeldJobData) -> Self {
        Self {
            sequence_id: data.sequence_id,
            business_id: data.business_id,
            device_id: data.device_id,
            device_name: data.device_name,
            details: data.details,
            completion_flag: data.completion_flag,
            created_at: data.created_at,
        }
    }

    /// Returns the store-assigned identity.
    #[must_use]
    pub const fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    /// Returns the business identifier, if assigned.
    #[must_use]
    pub const fn business_id(&self) -> Option<&BusinessId> {
        self.business_id.as_ref()
    }

    /// Returns the producing device.
    #[must_use]
    pub const fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the descriptive device label, if known.
    #[must_use]
    pub const fn device_name(&self) -> Option<&DeviceName> {
        self.device_name.as_ref()
    }

    /// Returns the weld parameters.
    #[must_use]
    pub const fn details(&self) -> &WeldJobDetails {
        &self.details
    }

    /// Returns the completion state.
    #[must_use]
    pub const fn completion_flag(&self) -> CompletionFlag {
        self.completion_flag
    }

    /// Returns `true` while the job is in progress.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.completion_flag.is_open()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attaches a business identifier to a record that has none.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobDomainError::BusinessIdAlreadyAssigned`] when the
    /// record already carries an identifier; identifiers are never replaced.
    pub fn assign_business_id(&mut self, business_id: BusinessId) -> Result<(), WeldJobDomainError> {
        if let Some(existing) = &self.business_id {
            return Err(WeldJobDomainError::BusinessIdAlreadyAssigned {
                sequence_id: self.sequence_id,
                business_id: existing.clone(),
            });
        }
        self.business_id = Some(business_id);
        Ok(())
    }

    /// Applies a registration payload to an open record.
    ///
    /// The device name is only replaced when the payload carries one.
    pub fn apply_registration(&mut self, device_name: Option<DeviceName>, details: WeldJobDetails) {
        if device_name.is_some() {
            self.device_name = device_name;
        }
        self.details = details;
    }

    /// Overwrites the editable fields without touching identity or state.
    pub fn edit(&mut self, device_name: Option<DeviceName>, details: WeldJobDetails) {
        self.apply_registration(device_name, details);
    }

    /// Closes the job.
    pub const fn mark_complete(&mut self) {
        self.completion_flag = CompletionFlag::Yes;
    }

    /// Nulls every domain field and closes the job.
    ///
    /// Identity, device columns, creation time and the business identifier
    /// are kept so the slot remains traceable.
    pub fn clear(&mut self) {
        self.details = WeldJobDetails::default();
        self.completion_flag = CompletionFlag::Yes;
    }
}

/// Insert payload for a fresh open job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWeldJob {
    business_id: BusinessId,
    device_id: DeviceId,
    device_name: Option<DeviceName>,
    details: WeldJobDetails,
    created_at: DateTime<Utc>,
}

impl NewWeldJob {
    /// Creates an insert payload stamped with the current clock time.
    #[must_use]
    pub fn new(
        business_id: BusinessId,
        device_id: DeviceId,
        device_name: Option<DeviceName>,
        details: WeldJobDetails,
        clock: &impl Clock,
    ) -> Self {
        Self {
            business_id,
            device_id,
            device_name,
            details,
            created_at: clock.utc(),
        }
    }

    /// Returns the allocated business identifier.
    #[must_use]
    pub const fn business_id(&self) -> &BusinessId {
        &self.business_id
    }

    /// Returns the producing device.
    #[must_use]
    pub const fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the descriptive device label, if known.
    #[must_use]
    pub const fn device_name(&self) -> Option<&DeviceName> {
        self.device_name.as_ref()
    }

    /// Returns the weld parameters.
    #[must_use]
    pub const fn details(&self) -> &WeldJobDetails {
        &self.details
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Completion state of every new job.
    #[must_use]
    pub const fn completion_flag(&self) -> CompletionFlag {
        CompletionFlag::No
    }

    /// Builds the record the store holds once a sequence is assigned.
    #[must_use]
    pub fn into_record(self, sequence_id: SequenceId) -> WeldJobRecord {
        WeldJobRecord {
            sequence_id,
            business_id: Some(self.business_id),
            device_id: self.device_id,
            device_name: self.device_name,
            details: self.details,
            completion_flag: CompletionFlag::No,
            created_at: self.created_at,
        }
    }
}

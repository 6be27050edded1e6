//! Error types for weld job domain validation and parsing.

use super::{BusinessId, SequenceId};
use thiserror::Error;

/// Errors returned while constructing or mutating weld job domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WeldJobDomainError {
    /// The device identifier is empty after trimming.
    #[error("device identifier must not be empty")]
    EmptyDeviceId,

    /// The device identifier exceeds the storage width.
    #[error("device identifier exceeds {max} characters: {value}")]
    DeviceIdTooLong {
        /// Offending value.
        value: String,
        /// Storage width.
        max: usize,
    },

    /// The device name is empty after trimming.
    #[error("device name must not be empty")]
    EmptyDeviceName,

    /// The device name exceeds the storage width.
    #[error("device name exceeds {max} characters: {value}")]
    DeviceNameTooLong {
        /// Offending value.
        value: String,
        /// Storage width.
        max: usize,
    },

    /// The business identifier is not five uppercase ASCII letters.
    #[error("invalid business identifier '{0}', expected 5 uppercase letters A-Z")]
    InvalidBusinessId(String),

    /// A free-text weld detail exceeds its storage width.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Storage width.
        max: usize,
    },

    /// A weld measurement is negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeMeasurement {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: i32,
    },

    /// The record already carries a business identifier.
    #[error("record {sequence_id} already has business identifier {business_id}")]
    BusinessIdAlreadyAssigned {
        /// Record whose identifier was to be replaced.
        sequence_id: SequenceId,
        /// Identifier currently held by the record.
        business_id: BusinessId,
    },
}

/// Error returned while parsing a completion flag from user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown completion flag: {0}, expected YES or NO")]
pub struct ParseCompletionFlagError(pub String);

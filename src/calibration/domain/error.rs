//! Error types for calibration records.

use thiserror::Error;

/// Errors returned while building or registering calibration records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalibrationDomainError {
    /// The instrument name is empty after trimming.
    #[error("instrument name must not be empty")]
    EmptyInstrumentName,

    /// The serial number is empty after trimming.
    #[error("serial number must not be empty")]
    EmptySerialNumber,

    /// A record with the same serial number is already registered.
    #[error("instrument {0} is already registered")]
    DuplicateSerialNumber(String),
}

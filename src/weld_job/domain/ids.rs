//! Identifier and validated scalar types for the weld job domain.

use super::WeldJobDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Database-assigned identity of a weld job record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceId(i32);

impl SequenceId {
    /// Wraps a sequence value assigned by the store.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the underlying sequence value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-facing five-letter code identifying one weld job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BusinessId(String);

impl BusinessId {
    /// Number of characters in every business identifier.
    pub const LENGTH: usize = 5;

    /// Characters a business identifier is drawn from.
    pub const ALPHABET: &'static [u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    /// Creates a validated business identifier.
    ///
    /// Surrounding whitespace is ignored, which tolerates values read back
    /// from padded `CHAR` columns.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobDomainError::InvalidBusinessId`] unless the value is
    /// exactly [`Self::LENGTH`] characters from [`Self::ALPHABET`].
    pub fn new(value: impl Into<String>) -> Result<Self, WeldJobDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let is_valid =
            trimmed.len() == Self::LENGTH && trimmed.bytes().all(|b| b.is_ascii_uppercase());
        if !is_valid {
            return Err(WeldJobDomainError::InvalidBusinessId(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wraps a value already known to satisfy the identifier rules.
    pub(crate) const fn from_generated(value: String) -> Self {
        Self(value)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BusinessId {
    type Error = WeldJobDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BusinessId> for String {
    fn from(value: BusinessId) -> Self {
        value.0
    }
}

impl AsRef<str> for BusinessId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text identifier of the welding controller that produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Storage width of the `device_id` column.
    pub const MAX_LENGTH: usize = 50;

    /// Creates a validated device identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobDomainError::EmptyDeviceId`] when the trimmed value
    /// is empty, or [`WeldJobDomainError::DeviceIdTooLong`] when it exceeds
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, WeldJobDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WeldJobDomainError::EmptyDeviceId);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(WeldJobDomainError::DeviceIdTooLong {
                value: trimmed.to_owned(),
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive device label used to scope dashboard views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceName(String);

impl DeviceName {
    /// Storage width of the `device_name` column.
    pub const MAX_LENGTH: usize = 50;

    /// Creates a validated device name.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobDomainError::EmptyDeviceName`] when the trimmed value
    /// is empty, or [`WeldJobDomainError::DeviceNameTooLong`] when it exceeds
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, WeldJobDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WeldJobDomainError::EmptyDeviceName);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(WeldJobDomainError::DeviceNameTooLong {
                value: trimmed.to_owned(),
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DeviceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Completion flag and derived job status.

use super::ParseCompletionFlagError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a weld job is still in progress on its device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionFlag {
    /// The job is open.
    #[default]
    #[serde(rename = "NO")]
    No,
    /// The job is closed.
    #[serde(rename = "YES")]
    Yes,
}

impl CompletionFlag {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::No => "NO",
            Self::Yes => "YES",
        }
    }

    /// Reads a stored flag permissively.
    ///
    /// Only the exact stored text `NO` marks an open job, matching the
    /// `completion_flag = 'NO'` filter of the open-job lookups and index.
    /// `NULL`, other casings and malformed values read as [`Self::Yes`] so a
    /// damaged historical row never blocks a device from registering new work.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("NO") => Self::No,
            _ => Self::Yes,
        }
    }

    /// Returns `true` for an open job.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::No)
    }
}

impl fmt::Display for CompletionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CompletionFlag {
    type Error = ParseCompletionFlagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "NO" => Ok(Self::No),
            "YES" => Ok(Self::Yes),
            _ => Err(ParseCompletionFlagError(value.to_owned())),
        }
    }
}

/// Status of the most recent job recorded for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LastJobStatus {
    /// The device has no records.
    NoRecord,
    /// The latest record is still open.
    Open,
    /// The latest record is closed, or its flag is unset.
    Completed,
}

impl LastJobStatus {
    /// Returns `true` when a new registration would start a fresh job.
    #[must_use]
    pub const fn allows_new_job(self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl From<CompletionFlag> for LastJobStatus {
    fn from(flag: CompletionFlag) -> Self {
        match flag {
            CompletionFlag::No => Self::Open,
            CompletionFlag::Yes => Self::Completed,
        }
    }
}

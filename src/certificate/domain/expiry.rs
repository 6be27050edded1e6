//! Expiry classification for dated qualifications.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days before expiry at which a certificate starts raising an alert.
pub const DEFAULT_EXPIRING_WINDOW_DAYS: u32 = 30;

/// Expiry state of a certificate on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// No expiry date.
    Permanent,
    /// The expiry date is before today.
    Expired,
    /// The expiry date falls inside the alert window.
    ExpiringSoon,
    /// The expiry date is beyond the alert window.
    Valid,
}

impl ExpiryStatus {
    /// Classifies an expiry date relative to `today`.
    ///
    /// A certificate expiring today is still valid today; one expiring
    /// exactly `window_days` from now is outside the window.
    #[must_use]
    pub fn classify(valid_until: Option<NaiveDate>, today: NaiveDate, window_days: u32) -> Self {
        let Some(expiry) = valid_until else {
            return Self::Permanent;
        };
        if expiry < today {
            return Self::Expired;
        }
        let window_end = today
            .checked_add_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MAX);
        if expiry < window_end {
            Self::ExpiringSoon
        } else {
            Self::Valid
        }
    }

    /// Returns `true` for states the dashboard raises an alert for.
    #[must_use]
    pub const fn needs_attention(self) -> bool {
        matches!(self, Self::Expired | Self::ExpiringSoon)
    }

    /// Returns the dashboard label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Permanent => "Permanent / No Expiry",
            Self::Expired => "Expired",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Valid => "Valid",
        }
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

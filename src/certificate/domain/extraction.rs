//! Structured fields produced by the certificate extractor.

use chrono::NaiveDate;
use serde::Deserialize;

/// Raw certificate fields as returned by the extractor.
///
/// Every field is optional: the extractor is told to return `null` for
/// anything it cannot find, and it is not trusted to comply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractedCertificate {
    /// Certificate number.
    pub certificate_number: Option<String>,
    /// Welder's name.
    pub welder_name: Option<String>,
    /// Welder identification number.
    pub identification_number: Option<String>,
    /// Welder address.
    pub address: Option<String>,
    /// Employer's name.
    pub employer_name: Option<String>,
    /// Date the welder was tested or first approved.
    pub date_of_welded_or_initial_approval: Option<String>,
    /// Qualified welding process.
    pub welding_process: Option<String>,
    /// Expiry date as written on the certificate.
    pub valid_until: Option<String>,
}

impl ExtractedCertificate {
    /// Parses the extractor's JSON reply.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the reply is not a certificate object.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content.trim())
    }
}

const DATE_FORMATS: [&str; 11] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const EMPTY_MARKERS: [&str; 4] = ["null", "none", "n/a", ""];

/// Converts an extracted date string to a date.
///
/// Missing values, the usual "no value" markers and anything unparseable
/// yield `None`. Slash-separated dates are read month first, falling back
/// to day first when the month would be out of range. A trailing time
/// component is ignored.
#[must_use]
pub fn parse_certificate_date(value: Option<&str>) -> Option<NaiveDate> {
    let trimmed = value?.trim();
    if EMPTY_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return None;
    }
    let date_part = trimmed
        .split(['T', ' '])
        .next()
        .filter(|head| head.len() == 10 && head.contains(['-', '/']))
        .unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

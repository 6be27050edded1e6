//! Labelled field extraction from recognized calibration certificates.
//!
//! Certificates from different laboratories label the same field in
//! different ways, so each field has a list of accepted labels. The first
//! label found anywhere in the text wins, and its value runs to the end of
//! the line (free text) or to the first character outside `[A-Za-z0-9/-]`
//! (codes). Labels are matched case-insensitively.

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};

const INSTRUMENT_LABELS: &str =
    r"Name of the instrument|Name of Instrument|Instrument Name|INSTRUMENT|Product|Description|Item";
const CUSTOMER_LABELS: &str = r"Name of the Customer|Customer Name|Customer";
const SERIAL_LABELS: &str =
    r"Serial No\./ID No\.|Serial No\.?|S\.No\.?|Serial Number|Sr\.? No\.?";
const MODEL_LABELS: &str = r"Model Number|Model No\.?|MODEL/TYPE|Model";
const CALIBRATION_DATE_LABELS: &str = r"Date of Calibration|CALIBRATION DATE|Cal\.?\s*Date";
const DUE_DATE_LABELS: &str =
    r"Calibration due date|Next Calibration Date|RECOMMENDED DUE DATE|Due Date|Valid Until";

const FREE_TEXT: &str = r"[^\n]+";
const CODE: &str = r"[A-Za-z0-9/\-]+";

/// Raw field values found in recognized text.
///
/// Values are trimmed, stripped of table separators (`|`) and `None` when
/// the label is absent or its value is blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCalibration {
    /// Instrument name.
    pub instrument_name: Option<String>,
    /// Customer the instrument belongs to.
    pub customer_name: Option<String>,
    /// Serial or ID number.
    pub serial_number: Option<String>,
    /// Model or type designation.
    pub model_number: Option<String>,
    /// Calibration date as written.
    pub calibration_date: Option<String>,
    /// Next due date as written.
    pub due_date: Option<String>,
}

/// Compiled label patterns for calibration certificates.
#[derive(Debug, Clone)]
pub struct CalibrationTextParser {
    instrument: Regex,
    customer: Regex,
    serial: Regex,
    model: Regex,
    calibration_date: Regex,
    due_date: Regex,
}

impl CalibrationTextParser {
    /// Compiles the label patterns.
    ///
    /// # Errors
    ///
    /// Returns the regex error if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            instrument: labelled(INSTRUMENT_LABELS, FREE_TEXT)?,
            customer: labelled(CUSTOMER_LABELS, FREE_TEXT)?,
            serial: labelled(SERIAL_LABELS, CODE)?,
            model: labelled(MODEL_LABELS, CODE)?,
            calibration_date: labelled(CALIBRATION_DATE_LABELS, FREE_TEXT)?,
            due_date: labelled(DUE_DATE_LABELS, FREE_TEXT)?,
        })
    }

    /// Picks the labelled fields out of recognized text.
    #[must_use]
    pub fn parse(&self, text: &str) -> ParsedCalibration {
        ParsedCalibration {
            instrument_name: capture(&self.instrument, text),
            customer_name: capture(&self.customer, text),
            serial_number: capture(&self.serial, text),
            model_number: capture(&self.model, text),
            calibration_date: capture(&self.calibration_date, text),
            due_date: capture(&self.due_date, text),
        }
    }
}

fn labelled(labels: &str, value: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"(?:{labels})[\s:|]*({value})"))
        .case_insensitive(true)
        .build()
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    let raw = pattern.captures(text)?.get(1)?.as_str().replace('|', "");
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

const DATE_FORMATS: [&str; 11] = [
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%m/%d/%Y",
];

/// Converts a labelled date value to a date.
///
/// Numeric dates are read day first, falling back to month first when the
/// month would be out of range. Trailing text on the line is ignored.
#[must_use]
pub fn parse_calibration_date(value: Option<&str>) -> Option<NaiveDate> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let candidates = [
        trimmed.to_owned(),
        tokens.iter().take(3).copied().collect::<Vec<_>>().join(" "),
        tokens.first().copied().unwrap_or_default().to_owned(),
    ];
    candidates.iter().find_map(|candidate| {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
    })
}

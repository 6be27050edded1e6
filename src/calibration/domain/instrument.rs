//! Confirmed calibration record for one instrument.

use super::{CalibrationDomainError, ParsedCalibration, parse_calibration_date};
use crate::certificate::domain::ExpiryStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calibration details an operator has confirmed and saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    instrument_name: String,
    serial_number: String,
    customer_name: Option<String>,
    model_number: Option<String>,
    calibration_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    file_name: Option<String>,
}

fn required(value: &str, err: CalibrationDomainError) -> Result<String, CalibrationDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_owned())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

impl CalibrationRecord {
    /// Creates a record with the two essential fields.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationDomainError::EmptyInstrumentName`] or
    /// [`CalibrationDomainError::EmptySerialNumber`] for blank values.
    pub fn new(instrument_name: &str, serial_number: &str) -> Result<Self, CalibrationDomainError> {
        Ok(Self {
            instrument_name: required(instrument_name, CalibrationDomainError::EmptyInstrumentName)?,
            serial_number: required(serial_number, CalibrationDomainError::EmptySerialNumber)?,
            customer_name: None,
            model_number: None,
            calibration_date: None,
            due_date: None,
            file_name: None,
        })
    }

    /// Builds a record from parsed scan text as the confirmation form would
    /// prefill it.
    ///
    /// # Errors
    ///
    /// Returns an error when the instrument name or serial number was not
    /// found in the text.
    pub fn from_parsed(parsed: &ParsedCalibration) -> Result<Self, CalibrationDomainError> {
        let record = Self::new(
            parsed.instrument_name.as_deref().unwrap_or_default(),
            parsed.serial_number.as_deref().unwrap_or_default(),
        )?;
        Ok(Self {
            customer_name: optional(parsed.customer_name.as_deref()),
            model_number: optional(parsed.model_number.as_deref()),
            calibration_date: parse_calibration_date(parsed.calibration_date.as_deref()),
            due_date: parse_calibration_date(parsed.due_date.as_deref()),
            ..record
        })
    }

    /// Sets the customer name.
    #[must_use]
    pub fn with_customer_name(mut self, value: &str) -> Self {
        self.customer_name = optional(Some(value));
        self
    }

    /// Sets the model number.
    #[must_use]
    pub fn with_model_number(mut self, value: &str) -> Self {
        self.model_number = optional(Some(value));
        self
    }

    /// Sets the date the instrument was calibrated.
    #[must_use]
    pub const fn with_calibration_date(mut self, date: NaiveDate) -> Self {
        self.calibration_date = Some(date);
        self
    }

    /// Sets the date the next calibration is due.
    #[must_use]
    pub const fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// Records the source document name.
    #[must_use]
    pub fn with_file_name(mut self, value: &str) -> Self {
        self.file_name = optional(Some(value));
        self
    }

    /// Returns the instrument name.
    #[must_use]
    pub fn instrument_name(&self) -> &str {
        &self.instrument_name
    }

    /// Returns the serial number.
    #[must_use]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Returns the customer name.
    #[must_use]
    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    /// Returns the model number.
    #[must_use]
    pub fn model_number(&self) -> Option<&str> {
        self.model_number.as_deref()
    }

    /// Returns the calibration date.
    #[must_use]
    pub const fn calibration_date(&self) -> Option<NaiveDate> {
        self.calibration_date
    }

    /// Returns the next due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the source document name.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Classifies the due date on `today`.
    ///
    /// A record without a due date never raises an alert.
    #[must_use]
    pub fn due_status(&self, today: NaiveDate, window_days: u32) -> ExpiryStatus {
        ExpiryStatus::classify(self.due_date, today, window_days)
    }
}

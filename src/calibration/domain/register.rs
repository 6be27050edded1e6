//! Session-scoped calibration register.

use super::{CalibrationDomainError, CalibrationRecord};
use crate::certificate::domain::ExpiryStatus;
use chrono::NaiveDate;

/// Calibration records saved during one operator session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalibrationRegister {
    records: Vec<CalibrationRecord>,
}

/// A record paired with its due state on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationStatus<'a> {
    /// Registered record.
    pub record: &'a CalibrationRecord,
    /// Due-date classification.
    pub status: ExpiryStatus,
}

impl CalibrationRegister {
    /// Creates an empty register.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a confirmed record.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationDomainError::DuplicateSerialNumber`] when an
    /// instrument with the same serial number is already registered.
    pub fn add(&mut self, record: CalibrationRecord) -> Result<(), CalibrationDomainError> {
        if self.find(record.serial_number()).is_some() {
            return Err(CalibrationDomainError::DuplicateSerialNumber(
                record.serial_number().to_owned(),
            ));
        }
        self.records.push(record);
        Ok(())
    }

    /// Removes a record by serial number.
    pub fn remove(&mut self, serial_number: &str) -> Option<CalibrationRecord> {
        let position = self
            .records
            .iter()
            .position(|record| record.serial_number() == serial_number)?;
        Some(self.records.remove(position))
    }

    /// Finds a record by serial number.
    #[must_use]
    pub fn find(&self, serial_number: &str) -> Option<&CalibrationRecord> {
        self.records
            .iter()
            .find(|record| record.serial_number() == serial_number)
    }

    /// Returns the records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[CalibrationRecord] {
        &self.records
    }

    /// Returns the number of registered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Classifies every record on `today`.
    #[must_use]
    pub fn statuses(&self, today: NaiveDate, window_days: u32) -> Vec<CalibrationStatus<'_>> {
        self.records
            .iter()
            .map(|record| CalibrationStatus {
                record,
                status: record.due_status(today, window_days),
            })
            .collect()
    }

    /// Returns only the records that are overdue or due soon.
    #[must_use]
    pub fn alerts(&self, today: NaiveDate, window_days: u32) -> Vec<CalibrationStatus<'_>> {
        self.statuses(today, window_days)
            .into_iter()
            .filter(|entry| entry.status.needs_attention())
            .collect()
    }
}

//! Document-to-register workflow for equipment calibration certificates.

use crate::calibration::domain::{
    CalibrationDomainError, CalibrationRecord, CalibrationRegister, CalibrationStatus,
    CalibrationTextParser, ParsedCalibration,
};
use crate::certificate::{
    domain::DEFAULT_EXPIRING_WINDOW_DAYS,
    ports::{CollaboratorError, DocumentRecognizer, SourceDocument},
};
use crate::retry::{RetryError, RetryPolicy};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};

/// Errors returned by the calibration intake workflow.
#[derive(Debug, Error)]
pub enum CalibrationIntakeError {
    /// Recognition failed after every retry.
    #[error("text recognition failed: {0}")]
    Recognition(#[source] RetryError<CollaboratorError>),

    /// Recognition returned no text.
    #[error("text recognition returned no text")]
    NoText,

    /// The confirmed record was rejected.
    #[error(transparent)]
    Domain(#[from] CalibrationDomainError),
}

/// Recognized text and the fields found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationScan {
    /// Recognized text, one non-blank line per recognizer line.
    pub text: String,
    /// Labelled fields found in the text.
    pub fields: ParsedCalibration,
    /// Time spent recognizing text, retries included.
    pub recognition: Duration,
}

/// Calibration intake workflow service.
#[derive(Clone)]
pub struct CalibrationIntakeService<R, C>
where
    R: DocumentRecognizer,
    C: Clock + Send + Sync,
{
    recognizer: Arc<R>,
    parser: CalibrationTextParser,
    clock: Arc<C>,
    policy: RetryPolicy,
    due_window_days: u32,
}

impl<R, C> CalibrationIntakeService<R, C>
where
    R: DocumentRecognizer,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default retry policy and due window.
    #[must_use]
    pub fn new(recognizer: Arc<R>, parser: CalibrationTextParser, clock: Arc<C>) -> Self {
        Self {
            recognizer,
            parser,
            clock,
            policy: RetryPolicy::default(),
            due_window_days: DEFAULT_EXPIRING_WINDOW_DAYS,
        }
    }

    /// Replaces the retry policy used for recognition.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the due-date alert window.
    #[must_use]
    pub const fn with_due_window(mut self, days: u32) -> Self {
        self.due_window_days = days;
        self
    }

    /// Recognizes an uploaded certificate and picks out its fields.
    ///
    /// Missing fields are left empty for the operator to fill in.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationIntakeError::Recognition`] once the recognizer
    /// has failed every attempt, or [`CalibrationIntakeError::NoText`] for
    /// blank scans.
    pub async fn extract(
        &self,
        document: &SourceDocument,
    ) -> Result<CalibrationScan, CalibrationIntakeError> {
        let started = Instant::now();
        let lines = self
            .policy
            .run("text recognition", || self.recognizer.recognize(document))
            .await
            .map_err(CalibrationIntakeError::Recognition)?;
        let text = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            return Err(CalibrationIntakeError::NoText);
        }
        let recognition = started.elapsed();

        let fields = self.parser.parse(&text);
        if fields.instrument_name.is_none() || fields.serial_number.is_none() {
            warn!(
                file_name = document.file_name(),
                "calibration scan is missing essential fields"
            );
        }
        info!(
            file_name = document.file_name(),
            recognition_ms = recognition.as_millis(),
            "parsed calibration fields"
        );
        Ok(CalibrationScan {
            text,
            fields,
            recognition,
        })
    }

    /// Adds a confirmed record to the session register.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationIntakeError::Domain`] when the register already
    /// holds the serial number.
    pub fn save(
        &self,
        register: &mut CalibrationRegister,
        record: CalibrationRecord,
    ) -> Result<(), CalibrationIntakeError> {
        let serial_number = record.serial_number().to_owned();
        let status = record.due_status(self.today(), self.due_window_days);
        register.add(record)?;
        info!(
            serial_number = %serial_number,
            status = %status,
            "saved calibration record"
        );
        Ok(())
    }

    /// Classifies every registered instrument as of today.
    #[must_use]
    pub fn statuses<'a>(&self, register: &'a CalibrationRegister) -> Vec<CalibrationStatus<'a>> {
        register.statuses(self.today(), self.due_window_days)
    }

    /// Returns the instruments overdue or due soon as of today.
    #[must_use]
    pub fn alerts<'a>(&self, register: &'a CalibrationRegister) -> Vec<CalibrationStatus<'a>> {
        register.alerts(self.today(), self.due_window_days)
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

//! Document-to-register workflow for welder qualification certificates.

use crate::certificate::{
    domain::{
        CertificateDomainError, CertificateRegister, CertificateStatus,
        DEFAULT_EXPIRING_WINDOW_DAYS, ExtractedCertificate, WelderCertificate,
    },
    ports::{CollaboratorError, DocumentRecognizer, FieldExtractor, SourceDocument},
};
use crate::retry::{RetryError, RetryPolicy};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::info;

/// Errors returned by the intake workflow.
#[derive(Debug, Error)]
pub enum CertificateIntakeError {
    /// Recognition failed after every retry.
    #[error("text recognition failed: {0}")]
    Recognition(#[source] RetryError<CollaboratorError>),

    /// Recognition returned no text.
    #[error("text recognition returned no text")]
    NoText,

    /// Extraction failed after every retry.
    #[error("field extraction failed: {0}")]
    Extraction(#[source] RetryError<CollaboratorError>),

    /// The extractor replied with nothing.
    #[error("field extraction returned an empty reply")]
    EmptyExtraction,

    /// The extractor's reply was not a certificate object.
    #[error("field extraction returned invalid JSON: {0}")]
    InvalidExtraction(#[source] serde_json::Error),

    /// The verified certificate was rejected.
    #[error(transparent)]
    Domain(#[from] CertificateDomainError),
}

/// Wall-clock time spent in each stage of one extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionTimings {
    /// Time spent recognizing text, retries included.
    pub recognition: Duration,
    /// Time spent extracting fields, retries included.
    pub extraction: Duration,
    /// End-to-end time.
    pub total: Duration,
}

/// Extractor output ready for operator verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    /// Fields as extracted.
    pub certificate: ExtractedCertificate,
    /// Stage timings.
    pub timings: ExtractionTimings,
}

/// Certificate intake workflow service.
#[derive(Clone)]
pub struct CertificateIntakeService<R, X, C>
where
    R: DocumentRecognizer,
    X: FieldExtractor,
    C: Clock + Send + Sync,
{
    recognizer: Arc<R>,
    extractor: Arc<X>,
    clock: Arc<C>,
    policy: RetryPolicy,
    expiring_window_days: u32,
}

impl<R, X, C> CertificateIntakeService<R, X, C>
where
    R: DocumentRecognizer,
    X: FieldExtractor,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default retry policy and alert window.
    #[must_use]
    pub fn new(recognizer: Arc<R>, extractor: Arc<X>, clock: Arc<C>) -> Self {
        Self {
            recognizer,
            extractor,
            clock,
            policy: RetryPolicy::default(),
            expiring_window_days: DEFAULT_EXPIRING_WINDOW_DAYS,
        }
    }

    /// Replaces the retry policy used for both collaborators.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the expiry alert window.
    #[must_use]
    pub const fn with_expiring_window(mut self, days: u32) -> Self {
        self.expiring_window_days = days;
        self
    }

    /// Recognizes and extracts the fields of an uploaded certificate.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateIntakeError::Recognition`] or
    /// [`CertificateIntakeError::Extraction`] once a collaborator has failed
    /// every attempt, [`CertificateIntakeError::NoText`] for blank scans,
    /// and [`CertificateIntakeError::EmptyExtraction`] or
    /// [`CertificateIntakeError::InvalidExtraction`] for unusable replies.
    pub async fn extract(
        &self,
        document: &SourceDocument,
    ) -> Result<ExtractionOutcome, CertificateIntakeError> {
        let started = Instant::now();

        let lines = self
            .policy
            .run("text recognition", || self.recognizer.recognize(document))
            .await
            .map_err(CertificateIntakeError::Recognition)?;
        let text = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            return Err(CertificateIntakeError::NoText);
        }
        let recognition = started.elapsed();

        let extraction_started = Instant::now();
        let reply = self
            .policy
            .run("field extraction", || self.extractor.extract(&text))
            .await
            .map_err(CertificateIntakeError::Extraction)?;
        if reply.trim().is_empty() {
            return Err(CertificateIntakeError::EmptyExtraction);
        }
        let certificate =
            ExtractedCertificate::from_json(&reply).map_err(CertificateIntakeError::InvalidExtraction)?;
        let extraction = extraction_started.elapsed();

        let timings = ExtractionTimings {
            recognition,
            extraction,
            total: started.elapsed(),
        };
        info!(
            file_name = document.file_name(),
            recognition_ms = timings.recognition.as_millis(),
            extraction_ms = timings.extraction.as_millis(),
            "extracted certificate fields"
        );
        Ok(ExtractionOutcome {
            certificate,
            timings,
        })
    }

    /// Adds a verified certificate to the session register.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateIntakeError::Domain`] when the register already
    /// holds the certificate number.
    pub fn save(
        &self,
        register: &mut CertificateRegister,
        certificate: WelderCertificate,
    ) -> Result<(), CertificateIntakeError> {
        let number = certificate.certificate_number().to_owned();
        register.add(certificate)?;
        info!(
            certificate_number = %number,
            status = %self.status_label(register, &number),
            "saved certificate"
        );
        Ok(())
    }

    /// Classifies every registered certificate as of today.
    #[must_use]
    pub fn statuses<'a>(&self, register: &'a CertificateRegister) -> Vec<CertificateStatus<'a>> {
        register.statuses(self.today(), self.expiring_window_days)
    }

    /// Returns the certificates needing attention as of today.
    #[must_use]
    pub fn alerts<'a>(&self, register: &'a CertificateRegister) -> Vec<CertificateStatus<'a>> {
        register.alerts(self.today(), self.expiring_window_days)
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    fn status_label(&self, register: &CertificateRegister, number: &str) -> &'static str {
        register.find(number).map_or("unknown", |certificate| {
            certificate
                .expiry_status(self.today(), self.expiring_window_days)
                .label()
        })
    }
}

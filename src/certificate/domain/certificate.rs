//! Verified welder qualification certificate.

use super::{CertificateDomainError, ExpiryStatus, ExtractedCertificate, parse_certificate_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A certificate an operator has verified and saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelderCertificate {
    certificate_number: String,
    welder_name: String,
    identification_number: Option<String>,
    employer_name: Option<String>,
    welding_process: Option<String>,
    address: Option<String>,
    initial_approval_date: Option<NaiveDate>,
    valid_until: Option<NaiveDate>,
    file_name: Option<String>,
}

fn required(value: &str, err: CertificateDomainError) -> Result<String, CertificateDomainError> {
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

impl WelderCertificate {
    /// Creates a certificate with the two mandatory fields.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateDomainError::EmptyCertificateNumber`] or
    /// [`CertificateDomainError::EmptyWelderName`] for blank values.
    pub fn new(
        certificate_number: &str,
        welder_name: &str,
    ) -> Result<Self, CertificateDomainError> {
        Ok(Self {
            certificate_number: required(
                certificate_number,
                CertificateDomainError::EmptyCertificateNumber,
            )?,
            welder_name: required(welder_name, CertificateDomainError::EmptyWelderName)?,
            identification_number: None,
            employer_name: None,
            welding_process: None,
            address: None,
            initial_approval_date: None,
            valid_until: None,
            file_name: None,
        })
    }

    /// Builds a certificate from extractor output as the verification form
    /// would prefill it.
    ///
    /// # Errors
    ///
    /// Returns an error when the certificate number or welder name is
    /// missing from the extraction.
    pub fn from_extraction(extracted: &ExtractedCertificate) -> Result<Self, CertificateDomainError> {
        let certificate = Self::new(
            extracted.certificate_number.as_deref().unwrap_or_default(),
            extracted.welder_name.as_deref().unwrap_or_default(),
        )?;
        Ok(Self {
            identification_number: optional(extracted.identification_number.as_deref()),
            employer_name: optional(extracted.employer_name.as_deref()),
            welding_process: optional(extracted.welding_process.as_deref()),
            address: optional(extracted.address.as_deref()),
            initial_approval_date: parse_certificate_date(
                extracted.date_of_welded_or_initial_approval.as_deref(),
            ),
            valid_until: parse_certificate_date(extracted.valid_until.as_deref()),
            ..certificate
        })
    }

    /// Sets the welder identification number.
    #[must_use]
    pub fn with_identification_number(mut self, value: &str) -> Self {
        self.identification_number = optional(Some(value));
        self
    }

    /// Sets the employer name.
    #[must_use]
    pub fn with_employer_name(mut self, value: &str) -> Self {
        self.employer_name = optional(Some(value));
        self
    }

    /// Sets the qualified welding process.
    #[must_use]
    pub fn with_welding_process(mut self, value: &str) -> Self {
        self.welding_process = optional(Some(value));
        self
    }

    /// Sets the welder address.
    #[must_use]
    pub fn with_address(mut self, value: &str) -> Self {
        self.address = optional(Some(value));
        self
    }

    /// Sets the initial approval date.
    #[must_use]
    pub const fn with_initial_approval_date(mut self, date: NaiveDate) -> Self {
        self.initial_approval_date = Some(date);
        self
    }

    /// Sets the expiry date.
    #[must_use]
    pub const fn with_valid_until(mut self, date: NaiveDate) -> Self {
        self.valid_until = Some(date);
        self
    }

    /// Marks the certificate as never expiring.
    #[must_use]
    pub const fn without_expiry(mut self) -> Self {
        self.valid_until = None;
        self
    }

    /// Records the source document name.
    #[must_use]
    pub fn with_file_name(mut self, value: &str) -> Self {
        self.file_name = optional(Some(value));
        self
    }

    /// Returns the certificate number.
    #[must_use]
    pub fn certificate_number(&self) -> &str {
        &self.certificate_number
    }

    /// Returns the welder name.
    #[must_use]
    pub fn welder_name(&self) -> &str {
        &self.welder_name
    }

    /// Returns the welder identification number.
    #[must_use]
    pub fn identification_number(&self) -> Option<&str> {
        self.identification_number.as_deref()
    }

    /// Returns the employer name.
    #[must_use]
    pub fn employer_name(&self) -> Option<&str> {
        self.employer_name.as_deref()
    }

    /// Returns the qualified welding process.
    #[must_use]
    pub fn welding_process(&self) -> Option<&str> {
        self.welding_process.as_deref()
    }

    /// Returns the welder address.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns the initial approval date.
    #[must_use]
    pub const fn initial_approval_date(&self) -> Option<NaiveDate> {
        self.initial_approval_date
    }

    /// Returns the expiry date; `None` for permanent certificates.
    #[must_use]
    pub const fn valid_until(&self) -> Option<NaiveDate> {
        self.valid_until
    }

    /// Returns the source document name; `None` for manual entries.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Classifies the certificate's expiry on `today`.
    #[must_use]
    pub fn expiry_status(&self, today: NaiveDate, window_days: u32) -> ExpiryStatus {
        ExpiryStatus::classify(self.valid_until, today, window_days)
    }
}

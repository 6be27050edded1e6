//! Session-scoped certificate register.

use super::{CertificateDomainError, ExpiryStatus, WelderCertificate};
use chrono::NaiveDate;

/// Certificates saved during one operator session.
///
/// The register is owned by the caller's session; nothing persists it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateRegister {
    certificates: Vec<WelderCertificate>,
}

/// A certificate paired with its expiry state on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateStatus<'a> {
    /// Registered certificate.
    pub certificate: &'a WelderCertificate,
    /// Expiry classification.
    pub status: ExpiryStatus,
}

impl CertificateRegister {
    /// Creates an empty register.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a verified certificate.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateDomainError::DuplicateCertificate`] when a
    /// certificate with the same number is already registered.
    pub fn add(&mut self, certificate: WelderCertificate) -> Result<(), CertificateDomainError> {
        if self.find(certificate.certificate_number()).is_some() {
            return Err(CertificateDomainError::DuplicateCertificate(
                certificate.certificate_number().to_owned(),
            ));
        }
        self.certificates.push(certificate);
        Ok(())
    }

    /// Removes a certificate by number.
    pub fn remove(&mut self, certificate_number: &str) -> Option<WelderCertificate> {
        let position = self
            .certificates
            .iter()
            .position(|cert| cert.certificate_number() == certificate_number)?;
        Some(self.certificates.remove(position))
    }

    /// Finds a certificate by number.
    #[must_use]
    pub fn find(&self, certificate_number: &str) -> Option<&WelderCertificate> {
        self.certificates
            .iter()
            .find(|cert| cert.certificate_number() == certificate_number)
    }

    /// Returns the certificates in insertion order.
    #[must_use]
    pub fn certificates(&self) -> &[WelderCertificate] {
        &self.certificates
    }

    /// Returns the number of registered certificates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Classifies every certificate on `today`.
    #[must_use]
    pub fn statuses(&self, today: NaiveDate, window_days: u32) -> Vec<CertificateStatus<'_>> {
        self.certificates
            .iter()
            .map(|certificate| CertificateStatus {
                certificate,
                status: certificate.expiry_status(today, window_days),
            })
            .collect()
    }

    /// Returns only the certificates that are expired or expiring soon.
    #[must_use]
    pub fn alerts(&self, today: NaiveDate, window_days: u32) -> Vec<CertificateStatus<'_>> {
        self.statuses(today, window_days)
            .into_iter()
            .filter(|entry| entry.status.needs_attention())
            .collect()
    }
}

//! Error types for certificate validation.

use thiserror::Error;

/// Errors returned while building or registering certificates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CertificateDomainError {
    /// The certificate number is empty after trimming.
    #[error("certificate number must not be empty")]
    EmptyCertificateNumber,

    /// The welder name is empty after trimming.
    #[error("welder name must not be empty")]
    EmptyWelderName,

    /// A certificate with the same number is already registered.
    #[error("certificate {0} is already registered")]
    DuplicateCertificate(String),
}

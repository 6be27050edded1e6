//! Domain model for welder qualification certificates.

mod certificate;
mod error;
mod expiry;
mod extraction;
mod register;

pub use certificate::WelderCertificate;
pub use error::CertificateDomainError;
pub use expiry::{DEFAULT_EXPIRING_WINDOW_DAYS, ExpiryStatus};
pub use extraction::{ExtractedCertificate, parse_certificate_date};
pub use register::{CertificateRegister, CertificateStatus};

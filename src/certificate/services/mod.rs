//! Certificate intake orchestration.

mod intake;

pub use intake::{
    CertificateIntakeError, CertificateIntakeService, ExtractionOutcome, ExtractionTimings,
};

//! Domain model for equipment calibration records.

mod error;
mod instrument;
mod parser;
mod register;

pub use error::CalibrationDomainError;
pub use instrument::CalibrationRecord;
pub use parser::{CalibrationTextParser, ParsedCalibration, parse_calibration_date};
pub use register::{CalibrationRegister, CalibrationStatus};

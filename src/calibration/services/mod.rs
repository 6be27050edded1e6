//! Calibration intake orchestration.

mod intake;

pub use intake::{CalibrationIntakeError, CalibrationIntakeService, CalibrationScan};

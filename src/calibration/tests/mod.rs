//! Unit tests for the calibration module.

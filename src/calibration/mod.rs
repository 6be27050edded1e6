//! Equipment calibration register.
//!
//! Calibration certificates for welding machines and gauges arrive as
//! scanned documents. The recognizer shared with [`crate::certificate`]
//! turns the scan into text, labelled fields are picked out of that text
//! with patterns, and an operator confirms the result before it joins the
//! session's register. Due dates are classified against the current date
//! the same way certificate expiry is.
//!
//! - Domain types and the text parser in [`domain`]
//! - The intake workflow in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;

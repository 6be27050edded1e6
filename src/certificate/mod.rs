//! Welder qualification certificate register.
//!
//! Certificates arrive as scanned documents. A recognizer turns the scan
//! into text, an extractor turns the text into structured fields, and an
//! operator verifies the result before it joins the session's register.
//! Expiry is classified against the current date for dashboard alerts.
//!
//! - Domain types in [`domain`]
//! - Collaborator contracts in [`ports`]
//! - The intake workflow in [`services`]

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

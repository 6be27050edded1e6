//! Weld job record lifecycle.
//!
//! A weld job is one attempt at a weld on a device. Registration either
//! resumes the device's open job or opens a new one under a freshly
//! allocated five-letter business identifier; completion and clearing close
//! it. The module follows hexagonal architecture:
//!
//! - Domain types and the pure schema planner in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
